use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

#[cfg(not(test))]
/// Localタイムゾーンでの今日の日付を取得する。
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}


#[cfg(test)]
pub use mock_date::today;

/// `YYYY-MM-DD`形式の日付をパースする。
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}
