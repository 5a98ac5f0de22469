//! テスト用のトランスポート
//!
//! リクエストを記録し、エンドポイントごとの失敗や遅延、同時実行数を制御・計測する。

use crate::api::error::InfraError;
use crate::api::transport::{ApiResult, SentCallback, UploadTransport};
use crate::api::types::UploadForm;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 記録されたリクエスト
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    /// JSONボディ、または multipart のテキストフィールドをまとめたオブジェクト
    pub body: Value,
    pub headers: HeaderMap,
}

#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    /// `/init` が返すセッションID（None ならボディは `{}`）
    session_id: Option<String>,
    fail_init: bool,
    fail_complete: bool,
    fail_cleanup: bool,
    /// 単発アップロードを失敗させる
    fail_simple: bool,
    /// チャンク番号 → 残りの失敗回数
    chunk_failures: Mutex<HashMap<u64, u32>>,
    /// チャンク番号ごとの応答遅延
    chunk_delays: HashMap<u64, Duration>,
    /// 全チャンク共通の応答遅延
    default_delay: Duration,
    /// 単発アップロードの応答遅延
    simple_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completion_order: Mutex<Vec<u64>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            session_id: Some("srv-session".to_string()),
            default_delay: Duration::from_millis(5),
            ..Self::default()
        }
    }

    /// `/init` が `sessionId` を返さない
    pub fn without_session_id(mut self) -> Self {
        self.session_id = None;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_complete(mut self) -> Self {
        self.fail_complete = true;
        self
    }

    pub fn failing_cleanup(mut self) -> Self {
        self.fail_cleanup = true;
        self
    }

    pub fn failing_simple(mut self) -> Self {
        self.fail_simple = true;
        self
    }

    pub fn with_simple_delay(mut self, delay: Duration) -> Self {
        self.simple_delay = delay;
        self
    }

    /// 指定チャンクを最初の `times` 回失敗させる
    pub fn fail_chunk(self, chunk_number: u64, times: u32) -> Self {
        self.chunk_failures
            .lock()
            .unwrap()
            .insert(chunk_number, times);
        self
    }

    pub fn delay_chunk(mut self, chunk_number: u64, delay: Duration) -> Self {
        self.chunk_delays.insert(chunk_number, delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// URL が `suffix` で終わるリクエスト
    pub fn calls_to(&self, suffix: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.url.ends_with(suffix))
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// チャンクの成功順
    pub fn completion_order(&self) -> Vec<u64> {
        self.completion_order.lock().unwrap().clone()
    }

    fn record(&self, url: &str, body: Value, headers: &HeaderMap) {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            body,
            headers: headers.clone(),
        });
    }

    fn server_error(url: &str) -> InfraError {
        InfraError::api(url, "Internal Server Error", Some(500))
    }

    async fn handle_chunk(&self, url: &str, form: &UploadForm) -> ApiResult<Value> {
        let chunk_number: u64 = form
            .field("chunkNumber")
            .and_then(|value| value.parse().ok())
            .expect("chunk form must carry chunkNumber");

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self
            .chunk_delays
            .get(&chunk_number)
            .copied()
            .unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let should_fail = {
            let mut failures = self.chunk_failures.lock().unwrap();
            match failures.get_mut(&chunk_number) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            }
        };
        if should_fail {
            return Err(Self::server_error(url));
        }

        self.completion_order.lock().unwrap().push(chunk_number);
        Ok(json!({ "received": chunk_number, "bytes": form.file.data.len() }))
    }
}

impl UploadTransport for MockTransport {
    async fn post_json<B>(&self, url: &str, body: &B, headers: &HeaderMap) -> ApiResult<Value>
    where
        B: Serialize + Sync,
    {
        let body = serde_json::to_value(body).expect("request body must serialize");
        self.record(url, body, headers);
        tokio::task::yield_now().await;

        if url.ends_with("/init") {
            if self.fail_init {
                return Err(Self::server_error(url));
            }
            return Ok(match &self.session_id {
                Some(id) => json!({ "sessionId": id }),
                None => json!({}),
            });
        }
        if url.ends_with("/complete") {
            if self.fail_complete {
                return Err(Self::server_error(url));
            }
            return Ok(json!({ "fileUrl": "https://cdn.example.com/files/1" }));
        }
        if url.ends_with("/cleanup") {
            if self.fail_cleanup {
                return Err(InfraError::network("connection reset"));
            }
            return Ok(Value::Null);
        }
        Err(InfraError::api(url, "Not Found", Some(404)))
    }

    async fn post_form(
        &self,
        url: &str,
        form: UploadForm,
        headers: &HeaderMap,
        on_sent: Option<SentCallback>,
    ) -> ApiResult<Value> {
        let mut fields: serde_json::Map<String, Value> = form
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        fields.insert(
            form.file.field.clone(),
            json!({ "fileName": form.file.file_name, "size": form.file.data.len() }),
        );
        self.record(url, Value::Object(fields), headers);

        if url.ends_with("/chunk") {
            return self.handle_chunk(url, &form).await;
        }

        let total = form.file.data.len() as u64;
        if let Some(callback) = &on_sent {
            callback(total / 2, total);
        }
        tokio::time::sleep(self.simple_delay).await;
        if self.fail_simple {
            return Err(Self::server_error(url));
        }
        if let Some(callback) = &on_sent {
            callback(total, total);
        }
        Ok(json!({ "fileUrl": "https://cdn.example.com/files/simple" }))
    }
}
