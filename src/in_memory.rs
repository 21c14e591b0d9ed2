use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::dispatcher::{ApiRequest, ApiResponse, Dispatcher, Envelope, Method, ResponseShape};
use crate::error::{ApiError, Error};

/// エントリーをメモリ上に保持するテスト用のDispatcher。
///
/// `PUT`は受け取った項目のみを保存済みのエントリーへ反映する。
pub struct InMemoryDispatcher {
    entries: Mutex<HashMap<String, Value>>,
    next_gid: Mutex<u64>,
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_gid: Mutex::new(1000),
        }
    }

    /// 保存されているエントリーを返す。
    pub fn stored(&self, gid: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(gid).cloned()
    }

    fn handle(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let not_found = || {
            ApiError::new(request.method.as_str(), request.path.clone())
                .with_status(404)
                .with_message("Not Found")
        };
        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
        let mut entries = self.entries.lock().unwrap();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["tasks", task, "time_tracking_entries"]) => Ok(Value::Array(
                entries
                    .values()
                    .filter(|entry| entry["task"]["gid"] == *task)
                    .cloned()
                    .collect(),
            )),
            (Method::Post, ["tasks", task, "time_tracking_entries"]) => {
                let mut next_gid = self.next_gid.lock().unwrap();
                *next_gid += 1;
                let gid = next_gid.to_string();
                let mut entry = json!({
                    "gid": gid.clone(),
                    "resource_type": "time_tracking_entry",
                    "task": {"gid": task, "resource_type": "task"},
                });
                merge(&mut entry, request_data(request));
                entries.insert(gid, entry.clone());
                Ok(entry)
            }
            (Method::Get, ["time_tracking_entries"]) => {
                Ok(Value::Array(entries.values().cloned().collect()))
            }
            (Method::Get, ["time_tracking_entries", gid]) => {
                entries.get(*gid).cloned().ok_or_else(not_found)
            }
            (Method::Put, ["time_tracking_entries", gid]) => {
                let entry = entries.get_mut(*gid).ok_or_else(not_found)?;
                merge(entry, request_data(request));
                Ok(entry.clone())
            }
            (Method::Delete, ["time_tracking_entries", gid]) => entries
                .remove(*gid)
                .map(|_| Value::Object(Map::new()))
                .ok_or_else(not_found),
            _ => Err(not_found()),
        }
    }
}

#[async_trait]
impl Dispatcher for InMemoryDispatcher {
    async fn request(
        &self,
        request: ApiRequest,
        shape: ResponseShape,
    ) -> Result<ApiResponse, Error> {
        let data = self.handle(&request)?;
        let body = json!({ "data": data });
        let envelope = Envelope {
            status: if request.method == Method::Post { 201 } else { 200 },
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "application/json".to_string(),
            )]),
            raw_body: body.to_string(),
            body,
            request,
        };

        Ok(shape.select(envelope))
    }
}

fn request_data(request: &ApiRequest) -> Option<&Map<String, Value>> {
    request.body.as_ref()?.get("data")?.as_object()
}

/// 受け取った項目をエントリーへ反映する。プロジェクトのgidは参照の形に変換する。
fn merge(entry: &mut Value, data: Option<&Map<String, Value>>) {
    if let (Value::Object(entry), Some(data)) = (entry, data) {
        data.iter().for_each(|(key, value)| {
            let value = match (key.as_str(), value) {
                ("attributable_to", Value::String(gid)) => {
                    json!({"gid": gid, "resource_type": "project"})
                }
                _ => value.clone(),
            };
            entry.insert(key.clone(), value);
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use serde_json::json;

    use super::InMemoryDispatcher;
    use crate::dispatcher::{ApiResponse, ResponseShape};
    use crate::time_tracking_entries::{
        ListAllOptions, ListOptions, RequestOptions, TimeTrackingEntries,
    };
    use crate::time_tracking_entry::{EntryData, TimeTrackingEntry};

    async fn create_entry(dispatcher: &InMemoryDispatcher) -> TimeTrackingEntry {
        let entries = TimeTrackingEntries::new(dispatcher);
        let data = EntryData {
            entered_on: NaiveDate::from_ymd_opt(2024, 3, 1),
            duration_minutes: Some(60),
            attributable_to: Some("222".to_string()),
        };
        entries
            .create("333", &data, &RequestOptions::default())
            .await
            .unwrap()
            .into_data()
            .unwrap()
    }

    /// 部分更新では送信した項目のみ変更されることを確認する。
    #[tokio::test]
    async fn test_partial_update_changes_only_submitted_fields() {
        let dispatcher = InMemoryDispatcher::new();
        let created = create_entry(&dispatcher).await;
        let before = dispatcher.stored(&created.gid).unwrap();

        let entries = TimeTrackingEntries::new(&dispatcher);
        let data = EntryData {
            duration_minutes: Some(15),
            ..Default::default()
        };
        entries
            .update(&created.gid, &data, &RequestOptions::default())
            .await
            .unwrap();

        let after = dispatcher.stored(&created.gid).unwrap();
        assert_eq!(after["duration_minutes"], json!(15));
        assert_eq!(after["entered_on"], before["entered_on"]);
        assert_eq!(after["attributable_to"], before["attributable_to"]);
        assert_eq!(after["task"], before["task"]);
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let dispatcher = InMemoryDispatcher::new();
        let created = create_entry(&dispatcher).await;
        let entries = TimeTrackingEntries::new(&dispatcher);
        let options = RequestOptions::default();

        let fetched: TimeTrackingEntry = entries
            .get(&created.gid, &options)
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.task.unwrap().gid, "333");

        let deleted = entries.delete(&created.gid, &options).await.unwrap();
        assert_eq!(deleted, ApiResponse::Data(json!({})));

        let error = entries.get(&created.gid, &options).await.unwrap_err();
        assert_eq!(error.status(), Some(404));
    }

    #[tokio::test]
    async fn test_list_for_task_and_all() {
        let dispatcher = InMemoryDispatcher::new();
        create_entry(&dispatcher).await;
        create_entry(&dispatcher).await;
        let entries = TimeTrackingEntries::new(&dispatcher);

        let for_task: Vec<TimeTrackingEntry> = entries
            .list_for_task("333", &ListOptions::default())
            .await
            .unwrap()
            .into_data()
            .unwrap();
        let for_other: Vec<TimeTrackingEntry> = entries
            .list_for_task("444", &ListOptions::default())
            .await
            .unwrap()
            .into_data()
            .unwrap();
        let all: Vec<TimeTrackingEntry> = entries
            .list_all(&ListAllOptions::default())
            .await
            .unwrap()
            .into_data()
            .unwrap();

        assert_eq!(for_task.len(), 2);
        assert!(for_other.is_empty());
        assert_eq!(all.len(), 2);
    }

    /// 同じ呼び出しで、指定した形式のレスポンスが返ることを確認する。
    #[rstest]
    #[tokio::test]
    async fn test_shape_selector(
        #[values(ResponseShape::Full, ResponseShape::Body, ResponseShape::Data)]
        shape: ResponseShape,
    ) {
        let dispatcher = InMemoryDispatcher::new();
        let created = create_entry(&dispatcher).await;
        let entries = TimeTrackingEntries::new(&dispatcher);
        let options = RequestOptions {
            shape,
            ..Default::default()
        };

        let response = entries.get(&created.gid, &options).await.unwrap();
        let stored = dispatcher.stored(&created.gid).unwrap();

        match (shape, &response) {
            (ResponseShape::Full, ApiResponse::Full(envelope)) => {
                assert_eq!(envelope.status, 200);
                assert_eq!(envelope.body, json!({ "data": stored }));
                assert_eq!(envelope.raw_body, envelope.body.to_string());
                assert_eq!(envelope.request.path, format!("/time_tracking_entries/{}", created.gid));
            }
            (ResponseShape::Body, ApiResponse::Body(body)) => {
                assert_eq!(body, &json!({ "data": stored }));
            }
            (ResponseShape::Data, ApiResponse::Data(data)) => {
                assert_eq!(data, &stored);
            }
            _ => panic!("unexpected response {:?} for {:?}", response, shape),
        }
    }
}
