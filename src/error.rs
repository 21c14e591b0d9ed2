use std::fmt;

use thiserror::Error;

/// APIクライアントが返すエラー。
///
/// ローカルでの入力チェックに失敗した場合は`Validation`、リモート呼び出しに失敗した場合は`Api`となる。
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 通信の失敗、エラーステータスに加えて、リクエスト・レスポンスのJSONの変換失敗も含む。
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    /// ローカルでの入力チェックによるエラーかどうかを返す。
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// リモート呼び出しのHTTPステータスを返す。
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status,
            Error::Validation(_) => None,
        }
    }
}

/// 通信前に検出される入力エラー。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`{0}` must not be empty")]
    EmptyId(&'static str),

    #[error("`{name}` is not a valid gid: {value:?}")]
    MalformedId { name: &'static str, value: String },

    #[error("`{0}` is required")]
    MissingField(&'static str),

    #[error("`limit` must be between 1 and 100, got {0}")]
    LimitOutOfRange(u32),

    #[error("`entered_on_start_date` ({start}) is after `entered_on_end_date` ({end})")]
    InvalidDateRange { start: String, end: String },

    #[error("unknown response shape: {0:?}")]
    UnknownShape(String),
}

/// リモート呼び出しのエラー。
///
/// 通信失敗の場合は`status`が`None`となる。
/// リクエストと結び付かないデコードの失敗は`ApiError::decode`で作り、`method`と`path`は空となる。
#[derive(Debug, PartialEq, Eq)]
pub struct ApiError {
    pub method: String,
    pub path: String,
    pub status: Option<u16>,
    pub messages: Vec<String>,
}

impl ApiError {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            status: None,
            messages: vec![],
        }
    }

    /// 受け取ったデータのデコードに失敗したことを表すエラーを返す。
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new("", "").with_message(message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.method.is_empty() {
            write!(f, "decoding response data failed")?;
        } else {
            write!(f, "{} {} failed", self.method, self.path)?;
        }
        if let Some(status) = self.status {
            write!(f, " with status {}", status)?;
        }
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
