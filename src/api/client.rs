/// HTTPクライアント
///
/// アップロードサーバーとの通信を担当する reqwest ベースのクライアント。
/// タイムアウト、エラーハンドリング、ヘッダーのマージを含みます。
use crate::api::error::InfraError;
use crate::api::transport::{ApiResult, SentCallback, UploadTransport};
use crate::api::types::{FormFile, UploadForm};
use crate::config::APP_CONFIG;
use bytes::Bytes;
use futures::Stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use serde::Serialize;
use std::time::Duration;

/// 送信進捗を通知する単位（64 KiB）
const PROGRESS_SLICE: usize = 64 * 1024;

/// APIクライアント
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// 新しいAPIクライアントを作成
    ///
    /// # Arguments
    /// * `timeout` - 1リクエストあたりのタイムアウト（チャンク1つ分を含む）
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InfraError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// ビルド時設定のタイムアウトでクライアントを作成
    pub fn from_config() -> ApiResult<Self> {
        Self::new(Duration::from_secs(APP_CONFIG.api.timeout_seconds))
    }

    /// 呼び出し元のヘッダーからボディ種別に関わるものを除く
    ///
    /// Content-Type と Content-Length はリクエストボディ（JSON / multipart の boundary）
    /// から決まるため、呼び出し元の値では上書きしません。
    fn protocol_headers(headers: &HeaderMap) -> HeaderMap {
        let mut merged = headers.clone();
        merged.remove(CONTENT_TYPE);
        merged.remove(CONTENT_LENGTH);
        merged
    }

    /// リクエストを送信し、エラーハンドリングを行う
    async fn send_with_error_handling(
        request: reqwest::RequestBuilder,
        url: &str,
        method: &str,
    ) -> ApiResult<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                InfraError::timeout(format!("{} {}", method, url))
            } else if e.is_connect() {
                InfraError::network(format!("Connection failed for {} {}: {}", method, url, e))
            } else {
                InfraError::network(format!("Request failed for {} {}: {}", method, url, e))
            }
        })
    }

    /// レスポンスをチェックしてエラーを返す
    pub async fn check_response(response: Response, endpoint: &str) -> ApiResult<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let message = if error_body.trim().is_empty() {
            status.to_string()
        } else {
            error_body
        };

        Err(InfraError::api(endpoint, message, Some(status_code)))
    }

    /// レスポンスボディを読み取ってJSONにする
    async fn read_body(response: Response) -> ApiResult<serde_json::Value> {
        let text = response
            .text()
            .await
            .map_err(|e| InfraError::network(format!("Failed to read response body: {}", e)))?;
        Ok(parse_body(&text))
    }

    /// ファイルパートを構築
    fn file_part(file: FormFile, on_sent: Option<SentCallback>) -> ApiResult<Part> {
        let total = file.data.len() as u64;
        let body = match on_sent {
            Some(callback) => Body::wrap_stream(progress_stream(file.data, callback)),
            None => Body::from(file.data),
        };

        Part::stream_with_length(body, total)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(|e| {
                InfraError::network(format!("Invalid MIME type '{}': {}", file.mime_type, e))
            })
    }
}

impl UploadTransport for ApiClient {
    async fn post_json<B>(
        &self,
        url: &str,
        body: &B,
        headers: &HeaderMap,
    ) -> ApiResult<serde_json::Value>
    where
        B: Serialize + Sync,
    {
        let request = self
            .client
            .post(url)
            .headers(Self::protocol_headers(headers))
            .json(body);

        let response = Self::send_with_error_handling(request, url, "POST").await?;
        let response = Self::check_response(response, url).await?;
        Self::read_body(response).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: UploadForm,
        headers: &HeaderMap,
        on_sent: Option<SentCallback>,
    ) -> ApiResult<serde_json::Value> {
        let UploadForm { fields, file } = form;
        let field = file.field.clone();

        let mut multipart = Form::new().part(field, Self::file_part(file, on_sent)?);
        for (name, value) in fields {
            multipart = multipart.text(name, value);
        }

        let request = self
            .client
            .post(url)
            .headers(Self::protocol_headers(headers))
            .multipart(multipart);

        let response = Self::send_with_error_handling(request, url, "POST").await?;
        let response = Self::check_response(response, url).await?;
        Self::read_body(response).await
    }
}

/// レスポンスボディをJSONとして解釈
///
/// 空ボディは `null`、JSONとして解釈できない本文は文字列として返します。
fn parse_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

/// データを PROGRESS_SLICE ごとに流し、送信済みバイト数を通知するストリーム
fn progress_stream(
    data: Bytes,
    callback: SentCallback,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = data.len() as u64;
    let pieces: Vec<Bytes> = (0..data.len())
        .step_by(PROGRESS_SLICE)
        .map(|start| data.slice(start..(start + PROGRESS_SLICE).min(data.len())))
        .collect();

    let mut sent = 0u64;
    futures::stream::iter(pieces.into_iter().map(move |piece| {
        sent += piece.len() as u64;
        callback(sent, total);
        Ok(piece)
    }))
}
