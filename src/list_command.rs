use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::datetime::parse_date;
use crate::dispatcher::{ApiResponse, Dispatcher, ResponseShape};
use crate::time_tracking_entries::{
    ListAllOptions, ListOptions, RequestOptions, TimeTrackingEntries,
};

/// エントリーの一覧を出力するためのサブコマンド。
#[derive(Debug, Default, clap::Args)]
pub struct ListArgs {
    #[clap(short = 't', long = "task", help = "Lists entries of the task")]
    task: Option<String>,

    #[clap(short = 'w', long = "workspace", help = "Filters by workspace gid")]
    workspace: Option<String>,

    #[clap(short = 'p', long = "project", help = "Filters by attributed project gid")]
    project: Option<String>,

    #[clap(long = "portfolio", help = "Filters by portfolio gid")]
    portfolio: Option<String>,

    #[clap(short = 'u', long = "user", help = "Filters by user gid")]
    user: Option<String>,

    #[clap(
        long = "from",
        help = "Entered on or after the date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    from: Option<NaiveDate>,

    #[clap(
        long = "to",
        help = "Entered on or before the date in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    to: Option<NaiveDate>,

    #[clap(short = 'l', long = "limit", help = "Results per page (1-100)")]
    limit: Option<u32>,

    #[clap(long = "offset", help = "Offset token of the next page")]
    offset: Option<String>,

    #[clap(short = 'f', long = "field", help = "Field to include in the response")]
    fields: Vec<String>,
}

impl ListArgs {
    /// タスク以外の絞り込み条件があるかを返す。
    fn has_filters(&self) -> bool {
        self.workspace.is_some()
            || self.project.is_some()
            || self.portfolio.is_some()
            || self.user.is_some()
            || self.from.is_some()
            || self.to.is_some()
    }
}

pub struct ListCommand<'a, D: Dispatcher> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatcher> ListCommand<'a, D> {
    /// 新しい`ListCommand`を返す。
    ///
    /// # Arguments
    /// * `dispatcher` - APIと通信するためのDispatcher
    pub fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// `list`サブコマンドの処理を行う。
    ///
    /// タスクのみが指定された場合はタスクのエントリーを、それ以外はワークスペース全体から条件に合うエントリーを取得する。
    pub async fn run(&self, args: ListArgs, shape: ResponseShape) -> Result<ApiResponse> {
        let entries = TimeTrackingEntries::new(self.dispatcher);
        let list = ListOptions {
            limit: args.limit,
            offset: args.offset.clone(),
            request: RequestOptions {
                opt_fields: args.fields.clone(),
                opt_pretty: false,
                shape,
            },
        };

        let for_task = args.task.clone().filter(|_| !args.has_filters());
        let response = match for_task {
            Some(task) => entries
                .list_for_task(&task, &list)
                .await
                .with_context(|| format!("Failed to list time tracking entries of task {}", task))?,
            None => {
                let options = ListAllOptions {
                    workspace: args.workspace,
                    task: args.task,
                    attributable_to: args.project,
                    portfolio: args.portfolio,
                    user: args.user,
                    entered_on_start_date: args.from,
                    entered_on_end_date: args.to,
                    list,
                };
                entries
                    .list_all(&options)
                    .await
                    .context("Failed to list time tracking entries")?
            }
        };
        info!("Time tracking entries retrieved successfully.");
        if let Some(offset) = response.next_offset() {
            info!("Next page offset: {}", offset);
        }

        Ok(response)
    }
}
