//! Asanaのタイムトラッキングエントリーを操作するためのクライアント。

pub mod config;
pub mod console;
pub mod create_command;
pub mod datetime;
pub mod delete_command;
pub mod dispatcher;
pub mod error;
pub mod http;
#[cfg(test)]
mod in_memory;
pub mod list_command;
pub mod logger;
pub mod show_command;
pub mod time_tracking_entries;
pub mod time_tracking_entry;
pub mod update_command;
pub mod validate;

pub use config::ClientConfig;
pub use dispatcher::{ApiRequest, ApiResponse, Dispatcher, Envelope, Method, ResponseShape};
pub use error::{ApiError, Error, ValidationError};
pub use http::HttpDispatcher;
pub use time_tracking_entries::{ListAllOptions, ListOptions, RequestOptions, TimeTrackingEntries};
pub use time_tracking_entry::{Compact, EntryData, TimeTrackingEntry};
