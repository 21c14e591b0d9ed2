use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use asana_tte::console::{ConsoleJson, ConsoleMarkdownList, ConsolePresenter};
use asana_tte::create_command::{CreateArgs, CreateCommand};
use asana_tte::delete_command::{DeleteArgs, DeleteCommand};
use asana_tte::list_command::{ListArgs, ListCommand};
use asana_tte::show_command::{ShowArgs, ShowCommand};
use asana_tte::update_command::{UpdateArgs, UpdateCommand};
use asana_tte::{logger, ClientConfig, HttpDispatcher, ResponseShape};

/// Asanaのタイムトラッキングエントリーを操作するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- list --task 1204365632425016
/// $ cargo run -- create --task 1204365632425016 --minutes 90
/// $ cargo run -- --shape full show 1204365632425017
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        short = 's',
        long = "shape",
        global = true,
        default_value = "data",
        help = "Response shape: full, body or data",
        parse(try_from_str),
    )]
    shape: ResponseShape,

    #[clap(long = "json", global = true, help = "Prints the response as JSON")]
    json: bool,

    #[clap(short = 'v', long = "verbose", global = true, help = "Shows debug logs")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    List(ListArgs),
    Create(CreateArgs),
    Show(ShowArgs),
    Update(UpdateArgs),
    Delete(DeleteArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger::init(level)?;

    let config = ClientConfig::from_env().context("Failed to load client config")?;
    let dispatcher = HttpDispatcher::new(config);

    let response = match args.subcommand {
        SubCommands::List(list) => ListCommand::new(&dispatcher).run(list, args.shape).await?,
        SubCommands::Create(create) => {
            CreateCommand::new(&dispatcher)
                .run(create, args.shape)
                .await?
        }
        SubCommands::Show(show) => ShowCommand::new(&dispatcher).run(show, args.shape).await?,
        SubCommands::Update(update) => {
            UpdateCommand::new(&dispatcher)
                .run(update, args.shape)
                .await?
        }
        SubCommands::Delete(delete) => {
            DeleteCommand::new(&dispatcher)
                .run(delete, args.shape)
                .await?
        }
    };

    let mut stdout = io::stdout();
    if args.json || args.shape != ResponseShape::Data {
        ConsoleJson::new(&mut stdout).show_response(&response)?;
    } else {
        ConsoleMarkdownList::new(&mut stdout).show_response(&response)?;
    }

    Ok(())
}
