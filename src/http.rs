use std::collections::BTreeMap;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    header::{HeaderMap, ACCEPT, CONTENT_TYPE},
    Client,
};
use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::{ApiRequest, ApiResponse, Dispatcher, Envelope, Method, ResponseShape};
use crate::error::{ApiError, Error};

/// Asana APIのエラーレスポンスをデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
struct AsanaErrors {
    errors: Vec<AsanaError>,
}

#[derive(Debug, Deserialize)]
struct AsanaError {
    message: String,
}

/// Asana APIと通信するためのDispatcher。
///
/// # Examples
///
/// ```ignore
/// let dispatcher = HttpDispatcher::new(ClientConfig::from_env()?);
/// let response = dispatcher.request(request, ResponseShape::Data).await?;
/// ```
pub struct HttpDispatcher {
    client: Client,
    config: ClientConfig,
}

impl HttpDispatcher {
    /// 新しい`HttpDispatcher`を返す。
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn request(
        &self,
        request: ApiRequest,
        shape: ResponseShape,
    ) -> Result<ApiResponse, Error> {
        let url = format!("{}{}", self.config.base_url, request.path);
        let api_error = || ApiError::new(request.method.as_str(), request.path.clone());

        let mut builder = self
            .client
            .request(Self::method(request.method), &url)
            .bearer_auth(&self.config.access_token)
            .header(ACCEPT, "application/json")
            .query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| api_error().with_message(format!("Failed to send request to {}: {}", url, e)))?;
        let status = response.status();
        let headers = collect_headers(response.headers());
        let raw_body = response
            .text()
            .await
            .map_err(|e| api_error().with_status(status.as_u16()).with_message(e.to_string()))?;
        debug!("{} {} -> {}", request.method, request.path, status);

        if !status.is_success() {
            warn!("{} {} returned {}", request.method, request.path, status);
            let messages = match serde_json::from_str::<AsanaErrors>(&raw_body) {
                Ok(errors) => errors.errors.into_iter().map(|e| e.message).collect(),
                Err(_) if raw_body.is_empty() => vec![],
                Err(_) => vec![raw_body],
            };
            return Err(ApiError {
                messages,
                ..api_error().with_status(status.as_u16())
            }
            .into());
        }

        let body = if raw_body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw_body).map_err(|e| {
                api_error()
                    .with_status(status.as_u16())
                    .with_message(format!("Failed to deserialize response: {}", e))
            })?
        };

        Ok(shape.select(Envelope {
            status: status.as_u16(),
            headers,
            raw_body,
            body,
            request,
        }))
    }
}

/// レスポンスヘッダーを名前ごとの値に変換する。
///
/// 同じ名前のヘッダーは`, `で連結し、UTF-8でない値は置換文字に変換する。
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers.keys().fold(BTreeMap::new(), |mut acc, name| {
        let values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();
        acc.insert(name.as_str().to_string(), values.join(", "));
        acc
    })
}
