use anyhow::{Context, Result};
use log::info;

use crate::dispatcher::{ApiResponse, Dispatcher, ResponseShape};
use crate::time_tracking_entries::{RequestOptions, TimeTrackingEntries};

/// エントリーを1件表示するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    #[clap(help = "Time tracking entry gid")]
    gid: String,

    #[clap(short = 'f', long = "field", help = "Field to include in the response")]
    fields: Vec<String>,
}

pub struct ShowCommand<'a, D: Dispatcher> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatcher> ShowCommand<'a, D> {
    /// 新しい`ShowCommand`を返す。
    pub fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// `show`サブコマンドの処理を行う。
    pub async fn run(&self, args: ShowArgs, shape: ResponseShape) -> Result<ApiResponse> {
        let options = RequestOptions {
            opt_fields: args.fields,
            opt_pretty: false,
            shape,
        };
        let response = TimeTrackingEntries::new(self.dispatcher)
            .get(&args.gid, &options)
            .await
            .with_context(|| format!("Failed to retrieve time tracking entry {}", args.gid))?;
        info!("Time tracking entry retrieved successfully.");

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ShowArgs, ShowCommand};
    use crate::dispatcher::{ApiResponse, MockDispatcher, ResponseShape};

    #[tokio::test]
    async fn test_show_command() {
        let args = ShowArgs {
            gid: "12345".to_string(),
            fields: vec!["task.name".to_string()],
        };
        let mut dispatcher = MockDispatcher::new();
        dispatcher
            .expect_request()
            .withf(|request, shape| {
                request.path == "/time_tracking_entries/12345"
                    && request.query_value("opt_fields") == Some("task.name")
                    && *shape == ResponseShape::Full
            })
            .times(1)
            .returning(|_, _| Ok(ApiResponse::Data(json!({"gid": "12345"}))));

        let command = ShowCommand::new(&dispatcher);
        let result = command.run(args, ResponseShape::Full).await;

        assert!(result.is_ok());
    }
}
