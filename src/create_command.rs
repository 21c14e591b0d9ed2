use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::datetime::{parse_date, today};
use crate::dispatcher::{ApiResponse, Dispatcher, ResponseShape};
use crate::time_tracking_entries::{RequestOptions, TimeTrackingEntries};
use crate::time_tracking_entry::EntryData;

/// エントリーを作成するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct CreateArgs {
    #[clap(short = 't', long = "task", help = "Task to log the time against")]
    task: String,

    #[clap(short = 'm', long = "minutes", help = "Duration in minutes")]
    minutes: u32,

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

pub struct CreateCommand<'a, D: Dispatcher> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatcher> CreateCommand<'a, D> {
    /// 新しい`CreateCommand`を返す。
    pub fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// `create`サブコマンドの処理を行う。
    ///
    /// 日付が指定されていない場合は、Localタイムゾーンで今日の日付を利用する。
    pub async fn run(&self, args: CreateArgs, shape: ResponseShape) -> Result<ApiResponse> {
        let data = EntryData {
            entered_on: Some(args.date.unwrap_or_else(today)),
            duration_minutes: Some(args.minutes),
            attributable_to: args.project,
        };
        info!("Create: {:?}", data);

        let response = TimeTrackingEntries::new(self.dispatcher)
            .create(
                &args.task,
                &data,
                &RequestOptions {
                    shape,
                    ..Default::default()
                },
            )
            .await
            .with_context(|| format!("Failed to create time tracking entry on task {}", args.task))?;
        info!("Time tracking entry created successfully.");

        Ok(response)
    }
}
