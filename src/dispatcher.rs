use std::{collections::BTreeMap, fmt, str::FromStr};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Error, ValidationError};

/// リクエストのHTTPメソッド。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatcherに渡すリクエスト。
///
/// `path`はベースURLからの相対パス、`body`は`{"data": ...}`で包まれたJSON。
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            body: None,
        }
    }

    /// クエリパラメータを追加する。
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// 値がある場合のみクエリパラメータを追加する。
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// `data`で包んだボディを設定する。
    pub fn data(mut self, data: Value) -> Self {
        self.body = Some(serde_json::json!({ "data": data }));
        self
    }

    /// 指定したキーのクエリパラメータの値を返す。
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTPレスポンス全体。
///
/// `headers`は名前を小文字にしたキーで持つ。同じ名前のヘッダーが複数ある場合は`, `で連結し、
/// UTF-8でない値は置換文字に変換する。
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Envelope {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub raw_body: String,
    pub body: Value,
    pub request: ApiRequest,
}

/// レスポンスの形式を選択する。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// ステータス、ヘッダー、ボディ、元のリクエストを含むレスポンス全体。
    Full,
    /// デコードしたボディ。ページング情報を含む。
    Body,
    /// ボディの`data`のみ。
    #[default]
    Data,
}

impl ResponseShape {
    /// レスポンス全体から指定された形式のレスポンスを作る。
    pub fn select(self, envelope: Envelope) -> ApiResponse {
        match self {
            ResponseShape::Full => ApiResponse::Full(envelope),
            ResponseShape::Body => ApiResponse::Body(envelope.body),
            ResponseShape::Data => ApiResponse::Data(data_of(envelope.body)),
        }
    }
}

impl FromStr for ResponseShape {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(ResponseShape::Full),
            "body" => Ok(ResponseShape::Body),
            "data" => Ok(ResponseShape::Data),
            _ => Err(ValidationError::UnknownShape(s.to_string())),
        }
    }
}

/// `ResponseShape`に従って返されるレスポンス。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Full(Envelope),
    Body(Value),
    Data(Value),
}

impl ApiResponse {
    pub fn shape(&self) -> ResponseShape {
        match self {
            ApiResponse::Full(_) => ResponseShape::Full,
            ApiResponse::Body(_) => ResponseShape::Body,
            ApiResponse::Data(_) => ResponseShape::Data,
        }
    }

    /// 形式によらず`data`部分を返す。
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApiResponse::Full(envelope) => envelope.body.get("data"),
            ApiResponse::Body(body) => body.get("data"),
            ApiResponse::Data(data) => Some(data),
        }
    }

    /// 次ページの`offset`を返す。`Data`形式ではページング情報を持たない。
    pub fn next_offset(&self) -> Option<&str> {
        let body = match self {
            ApiResponse::Full(envelope) => &envelope.body,
            ApiResponse::Body(body) => body,
            ApiResponse::Data(_) => return None,
        };
        body.get("next_page")?.get("offset")?.as_str()
    }

    /// `data`部分を指定された型にデシリアライズする。
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, Error> {
        let (data, request) = match self {
            ApiResponse::Full(envelope) => (data_of(envelope.body), Some(envelope.request)),
            ApiResponse::Body(body) => (data_of(body), None),
            ApiResponse::Data(data) => (data, None),
        };
        serde_json::from_value(data).map_err(|e| {
            let message = format!("Failed to decode response data: {}", e);
            let error = match request {
                Some(request) => ApiError::new(request.method.as_str(), request.path)
                    .with_message(message),
                None => ApiError::decode(message),
            };
            Error::Api(error)
        })
    }
}

fn data_of(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// APIリクエストを送信するためのtrait。
///
/// 認証や通信はこのtraitの実装が担当する。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// リクエストを送信し、指定された形式でレスポンスを返す。
    ///
    /// # Arguments
    ///
    /// * `request` - 送信するリクエスト
    /// * `shape` - 返すレスポンスの形式
    async fn request(&self, request: ApiRequest, shape: ResponseShape)
        -> Result<ApiResponse, Error>;
}
