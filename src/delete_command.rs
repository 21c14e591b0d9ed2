use anyhow::{Context, Result};
use log::info;

use crate::dispatcher::{ApiResponse, Dispatcher, ResponseShape};
use crate::time_tracking_entries::{RequestOptions, TimeTrackingEntries};

/// エントリーを削除するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct DeleteArgs {
    #[clap(help = "Time tracking entry gid")]
    gid: String,
}

pub struct DeleteCommand<'a, D: Dispatcher> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatcher> DeleteCommand<'a, D> {
    /// 新しい`DeleteCommand`を返す。
    pub fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// `delete`サブコマンドの処理を行う。削除したエントリーは元に戻せない。
    pub async fn run(&self, args: DeleteArgs, shape: ResponseShape) -> Result<ApiResponse> {
        let response = TimeTrackingEntries::new(self.dispatcher)
            .delete(
                &args.gid,
                &RequestOptions {
                    shape,
                    ..Default::default()
                },
            )
            .await
            .with_context(|| format!("Failed to delete time tracking entry {}", args.gid))?;
        info!("Time tracking entry {} deleted.", args.gid);

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteArgs, DeleteCommand};
    use crate::dispatcher::{MockDispatcher, ResponseShape};
    use crate::error::ApiError;

    #[tokio::test]
    async fn test_delete_command_not_found() {
        let args = DeleteArgs {
            gid: "12345".to_string(),
        };
        let mut dispatcher = MockDispatcher::new();
        dispatcher
            .expect_request()
            .times(1)
            .returning(|request, _| {
                Err(ApiError::new(request.method.as_str(), request.path)
                    .with_status(404)
                    .into())
            });

        let command = DeleteCommand::new(&dispatcher);
        let error = command.run(args, ResponseShape::Data).await.unwrap_err();

        assert_eq!(
            error.to_string(),
            "Failed to delete time tracking entry 12345"
        );
        assert_eq!(
            error.root_cause().to_string(),
            "DELETE /time_tracking_entries/12345 failed with status 404"
        );
    }
}
