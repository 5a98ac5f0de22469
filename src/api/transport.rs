//! アップローダーとHTTPの境界
//!
//! アップロード処理（uploader）はこのトレイトだけに依存し、
//! 実際の通信は [`ApiClient`](crate::api::client::ApiClient) が担当します。
//! テストではリクエストを記録するモック実装に差し替えます。

use crate::api::error::InfraError;
use crate::api::types::UploadForm;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// トランスポート層の結果型
pub type ApiResult<T> = Result<T, InfraError>;

/// 送信済みバイト数の通知 `(bytes_sent, bytes_total)`
pub type SentCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// アップロードプロトコルが使うHTTP操作
///
/// どちらのメソッドも、2xx 以外のレスポンスは `InfraError::Api` として返します。
/// 成功時はレスポンスボディをJSONとして返します（空ボディは `null`）。
pub trait UploadTransport: Sync {
    /// JSONボディをPOSTする
    fn post_json<B>(
        &self,
        url: &str,
        body: &B,
        headers: &HeaderMap,
    ) -> impl Future<Output = ApiResult<serde_json::Value>> + Send
    where
        B: Serialize + Sync;

    /// multipart/form-data をPOSTする
    ///
    /// `on_sent` が指定された場合、ファイルパートの送信に合わせて呼び出されます。
    fn post_form(
        &self,
        url: &str,
        form: UploadForm,
        headers: &HeaderMap,
        on_sent: Option<SentCallback>,
    ) -> impl Future<Output = ApiResult<serde_json::Value>> + Send;
}
