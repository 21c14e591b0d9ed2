use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 他のリソースへの参照。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Compact {
    pub gid: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// タイムトラッキングエントリー。
///
/// `opt_fields`で取得する項目を絞り込めるため、`gid`以外は省略されうる。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeTrackingEntry {
    pub gid: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub entered_on: Option<NaiveDate>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub created_by: Option<Compact>,
    #[serde(default)]
    pub task: Option<Compact>,
    #[serde(default)]
    pub attributable_to: Option<Compact>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 作成・更新時に送信するデータ。
///
/// 指定した項目のみ送信されるため、更新時は指定しなかった項目は変更されない。
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntryData {
    /// 時間を記録する日。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entered_on: Option<NaiveDate>,
    /// 記録する時間(分)。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// 時間を割り当てるプロジェクトのgid。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributable_to: Option<String>,
}

impl EntryData {
    pub fn new(entered_on: NaiveDate, duration_minutes: u32) -> Self {
        Self {
            entered_on: Some(entered_on),
            duration_minutes: Some(duration_minutes),
            attributable_to: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
