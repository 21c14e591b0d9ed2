use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::datetime::parse_date;
use crate::dispatcher::{ApiResponse, Dispatcher, ResponseShape};
use crate::time_tracking_entries::{RequestOptions, TimeTrackingEntries};
use crate::time_tracking_entry::EntryData;

/// エントリーを更新するためのサブコマンド。
///
/// 指定した項目のみ更新する。
#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    #[clap(help = "Time tracking entry gid")]
    gid: String,

    #[clap(short = 'm', long = "minutes", help = "Duration in minutes")]
    minutes: Option<u32>,

    #[clap(
        short = 'd',
        long = "date",
        help = "Sets a custom date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,

    #[clap(short = 'p', long = "project", help = "Project gid to attribute the time to")]
    project: Option<String>,
}

pub struct UpdateCommand<'a, D: Dispatcher> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatcher> UpdateCommand<'a, D> {
    /// 新しい`UpdateCommand`を返す。
    pub fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// `update`サブコマンドの処理を行う。
    ///
    /// 更新する項目が1つも指定されていない場合はエラーを返す。
    pub async fn run(&self, args: UpdateArgs, shape: ResponseShape) -> Result<ApiResponse> {
        let data = EntryData {
            entered_on: args.date,
            duration_minutes: args.minutes,
            attributable_to: args.project,
        };
        if data.is_empty() {
            bail!("Nothing to update: specify --minutes, --date or --project");
        }
        info!("Update {}: {:?}", args.gid, data);

        let response = TimeTrackingEntries::new(self.dispatcher)
            .update(
                &args.gid,
                &data,
                &RequestOptions {
                    shape,
                    ..Default::default()
                },
            )
            .await
            .with_context(|| format!("Failed to update time tracking entry {}", args.gid))?;
        info!("Time tracking entry updated successfully.");

        Ok(response)
    }
}
