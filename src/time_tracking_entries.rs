use chrono::NaiveDate;
use log::debug;

use crate::dispatcher::{ApiRequest, ApiResponse, Dispatcher, Method, ResponseShape};
use crate::error::{ApiError, Error, ValidationError};
use crate::time_tracking_entry::EntryData;
use crate::validate::{optional_gid, require_fields, require_gid};

/// 1ページで取得できる最大件数。
pub const MAX_LIMIT: u32 = 100;

/// 全操作に共通するオプション。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// レスポンスに含める項目。
    pub opt_fields: Vec<String>,
    /// 整形されたJSONを返させる。
    pub opt_pretty: bool,
    pub shape: ResponseShape,
}

/// 一覧取得のオプション。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<u32>,
    /// 前のレスポンスの`next_page.offset`。
    pub offset: Option<String>,
    pub request: RequestOptions,
}

/// ワークスペース全体の一覧取得のオプション。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListAllOptions {
    pub workspace: Option<String>,
    pub task: Option<String>,
    pub attributable_to: Option<String>,
    pub portfolio: Option<String>,
    pub user: Option<String>,
    pub entered_on_start_date: Option<NaiveDate>,
    pub entered_on_end_date: Option<NaiveDate>,
    pub list: ListOptions,
}

/// タイムトラッキングエントリーのAPI。
///
/// 入力をチェックした後、リクエストを`Dispatcher`に渡す。状態は持たない。
///
/// # Examples
///
/// ```ignore
/// let dispatcher = HttpDispatcher::new(ClientConfig::from_env()?);
/// let entries = TimeTrackingEntries::new(&dispatcher);
/// let response = entries.get("12345", &RequestOptions::default()).await?;
/// ```
pub struct TimeTrackingEntries<'a, D: Dispatcher> {
    dispatcher: &'a D,
}

impl<'a, D: Dispatcher> TimeTrackingEntries<'a, D> {
    /// 新しい`TimeTrackingEntries`を返す。
    pub fn new(dispatcher: &'a D) -> Self {
        Self { dispatcher }
    }

    /// タスクに記録されたエントリーの一覧を取得する。
    ///
    /// # Arguments
    ///
    /// * `task_gid` - タスクのgid
    /// * `options` - ページングと取得項目の指定
    pub async fn list_for_task(
        &self,
        task_gid: &str,
        options: &ListOptions,
    ) -> Result<ApiResponse, Error> {
        require_gid("task_gid", task_gid)?;
        let request = ApiRequest::new(
            Method::Get,
            format!("/tasks/{}/time_tracking_entries", task_gid),
        );
        let request = list_query(request, options)?;

        self.send(request, options.request.shape).await
    }

    /// タスクにエントリーを作成する。
    ///
    /// `entered_on`と`duration_minutes`が指定されていない場合は通信せずにエラーを返す。
    pub async fn create(
        &self,
        task_gid: &str,
        data: &EntryData,
        options: &RequestOptions,
    ) -> Result<ApiResponse, Error> {
        require_gid("task_gid", task_gid)?;
        let request = ApiRequest::new(
            Method::Post,
            format!("/tasks/{}/time_tracking_entries", task_gid),
        );
        let data = to_value(&request, data)?;
        require_fields(&data, &["entered_on", "duration_minutes"])?;
        let request = request.data(data);

        self.send(request_query(request, options), options.shape)
            .await
    }

    /// エントリーを1件取得する。
    pub async fn get(
        &self,
        entry_gid: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, Error> {
        require_gid("time_tracking_entry_gid", entry_gid)?;
        let request = ApiRequest::new(Method::Get, entry_path(entry_gid));

        self.send(request_query(request, options), options.shape)
            .await
    }

    /// エントリーを更新する。
    ///
    /// `data`で指定した項目のみ更新され、それ以外の項目は変更されない。
    pub async fn update(
        &self,
        entry_gid: &str,
        data: &EntryData,
        options: &RequestOptions,
    ) -> Result<ApiResponse, Error> {
        require_gid("time_tracking_entry_gid", entry_gid)?;
        let request = ApiRequest::new(Method::Put, entry_path(entry_gid));
        let data = to_value(&request, data)?;
        let request = request.data(data);

        self.send(request_query(request, options), options.shape)
            .await
    }

    /// エントリーを削除する。削除は取り消せない。
    ///
    /// `Data`形式のレスポンスは空のオブジェクトとなる。
    pub async fn delete(
        &self,
        entry_gid: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, Error> {
        require_gid("time_tracking_entry_gid", entry_gid)?;
        let request = ApiRequest::new(Method::Delete, entry_path(entry_gid));

        self.send(request_query(request, options), options.shape)
            .await
    }

    /// ワークスペース全体からエントリーの一覧を取得する。
    ///
    /// # Arguments
    ///
    /// * `options` - 絞り込み条件、ページング、取得項目の指定
    pub async fn list_all(&self, options: &ListAllOptions) -> Result<ApiResponse, Error> {
        optional_gid("workspace", options.workspace.as_deref())?;
        optional_gid("task", options.task.as_deref())?;
        optional_gid("attributable_to", options.attributable_to.as_deref())?;
        optional_gid("portfolio", options.portfolio.as_deref())?;
        optional_gid("user", options.user.as_deref())?;
        if let (Some(start), Some(end)) =
            (options.entered_on_start_date, options.entered_on_end_date)
        {
            if start > end {
                return Err(ValidationError::InvalidDateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                }
                .into());
            }
        }

        let request = ApiRequest::new(Method::Get, "/time_tracking_entries")
            .query_opt("workspace", options.workspace.as_ref())
            .query_opt("task", options.task.as_ref())
            .query_opt("attributable_to", options.attributable_to.as_ref())
            .query_opt("portfolio", options.portfolio.as_ref())
            .query_opt("user", options.user.as_ref())
            .query_opt("entered_on_start_date", options.entered_on_start_date)
            .query_opt("entered_on_end_date", options.entered_on_end_date);
        let request = list_query(request, &options.list)?;

        self.send(request, options.list.request.shape).await
    }

    async fn send(&self, request: ApiRequest, shape: ResponseShape) -> Result<ApiResponse, Error> {
        debug!("{} {} {:?}", request.method, request.path, request.query);
        self.dispatcher.request(request, shape).await
    }
}

fn entry_path(entry_gid: &str) -> String {
    format!("/time_tracking_entries/{}", entry_gid)
}

/// 送信するデータをJSONに変換する。失敗した場合は送信予定のリクエストのエラーとする。
fn to_value(request: &ApiRequest, data: &EntryData) -> Result<serde_json::Value, Error> {
    serde_json::to_value(data).map_err(|e| {
        ApiError::new(request.method.as_str(), request.path.clone())
            .with_message(format!("Failed to encode request data: {}", e))
            .into()
    })
}

/// 取得項目と整形のクエリを追加する。
fn request_query(request: ApiRequest, options: &RequestOptions) -> ApiRequest {
    let request = if options.opt_fields.is_empty() {
        request
    } else {
        request.query("opt_fields", options.opt_fields.join(","))
    };
    if options.opt_pretty {
        request.query("opt_pretty", true)
    } else {
        request
    }
}

/// ページングのクエリを追加する。
fn list_query(request: ApiRequest, options: &ListOptions) -> Result<ApiRequest, Error> {
    if let Some(limit) = options.limit {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(ValidationError::LimitOutOfRange(limit).into());
        }
    }
    let request = request
        .query_opt("limit", options.limit)
        .query_opt("offset", options.offset.as_ref());

    Ok(request_query(request, &options.request))
}
