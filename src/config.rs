use std::env;

use anyhow::{Context, Result};

/// AsanaのREST APIのベースURL。
pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

/// APIクライアントの設定。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// 環境変数から設定を読み込む。
    ///
    /// 環境変数`ASANA_ACCESS_TOKEN`が設定されていない場合はエラーを返す。
    /// `ASANA_BASE_URL`が設定されていない場合は`DEFAULT_BASE_URL`を利用する。
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 指定された関数で値を取得して設定を作る。
    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let access_token = lookup("ASANA_ACCESS_TOKEN")
            .filter(|token| !token.is_empty())
            .context("ASANA_ACCESS_TOKEN must be set")?;
        let base_url = lookup("ASANA_BASE_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(base_url, access_token))
    }
}
