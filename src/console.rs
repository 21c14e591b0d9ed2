use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::dispatcher::ApiResponse;
use crate::time_tracking_entry::TimeTrackingEntry;

/// Consoleにレスポンスを表示するためのtrait。
pub trait ConsolePresenter {
    /// レスポンスを表示する。
    ///
    /// # Arguments
    ///
    /// * `response` - 表示するレスポンス
    fn show_response(&mut self, response: &ApiResponse) -> Result<()>;
}

/// エントリーをMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    fn show_entries(&mut self, entries: &[TimeTrackingEntry]) -> Result<()> {
        let mut sorted_entries = entries.to_vec();
        sorted_entries.sort_by_key(|entry| entry.entered_on);

        for entry in sorted_entries {
            let date_str = entry
                .entered_on
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            let duration_str = entry
                .duration_minutes
                .map(format_minutes)
                .unwrap_or_else(|| "-".to_string());
            let task_str = entry
                .task
                .as_ref()
                .map(|task| task.name.clone().unwrap_or_else(|| task.gid.clone()))
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                self.writer,
                "- {}: {} {} ({})",
                date_str, duration_str, task_str, entry.gid
            )
            .with_context(|| format!("Failed to write time tracking entry: {:?}", entry))?;
        }

        Ok(())
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // dataが配列の場合は一覧、オブジェクトの場合は1件として表示する。
    fn show_response(&mut self, response: &ApiResponse) -> Result<()> {
        let entries: Vec<TimeTrackingEntry> = match response.data() {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| serde_json::from_value(item.clone()))
                .collect::<Result<Vec<TimeTrackingEntry>, _>>()
                .context("Failed to decode time tracking entries")?,
            Some(Value::Object(map)) if !map.is_empty() => vec![serde_json::from_value(
                Value::Object(map.clone()),
            )
            .context("Failed to decode time tracking entry")?],
            _ => vec![],
        };

        self.show_entries(&entries)
    }
}

/// レスポンスを整形したJSONで表示する。
pub struct ConsoleJson<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleJson<'a, W> {
    /// 新しい`ConsoleJson`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleJson<'a, W> {
    fn show_response(&mut self, response: &ApiResponse) -> Result<()> {
        let json = serde_json::to_string_pretty(response).context("Failed to encode response")?;
        writeln!(self.writer, "{}", json).context("Failed to write response")?;

        Ok(())
    }
}

/// 分を`1h30m`の形式にする。
fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{}m", h, m),
    }
}
