//! 単発アップロード
//!
//! ファイル全体を1回の multipart POST で送る。送信済みバイト数から進捗を通知し、
//! 中断ハンドルが発火したらリクエストを破棄する。

use crate::api::error::InfraError;
use crate::api::transport::{ApiResult, SentCallback, UploadTransport};
use crate::api::types::{FormFile, UploadForm};
use crate::domain::progress::{PercentTracker, ProgressFn};
use crate::uploader::error::UploadError;
use crate::uploader::options::AbortHandle;
use crate::uploader::source::UploadSource;
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// ファイルを1回のリクエストでアップロードする
pub async fn upload_with_progress<T, S>(
    transport: &T,
    source: &S,
    upload_url: &str,
    on_progress: Option<ProgressFn>,
    headers: &HeaderMap,
    abort: Option<&AbortHandle>,
) -> Result<serde_json::Value, UploadError>
where
    T: UploadTransport,
    S: UploadSource,
{
    let progress = Arc::new(PercentTracker::new(on_progress));

    let request = async {
        let data = source
            .read_range(0, source.size())
            .await
            .map_err(InfraError::from)?;
        let form = UploadForm::new(FormFile {
            field: "file".to_string(),
            file_name: source.name().to_string(),
            mime_type: source.mime_type().to_string(),
            data,
        });

        let tracker = progress.clone();
        let on_sent: SentCallback = Arc::new(move |sent, total| {
            tracker.bytes_sent(sent, total);
        });
        let response: ApiResult<serde_json::Value> = transport
            .post_form(upload_url, form, headers, Some(on_sent))
            .await;
        response
    };

    tracing::info!("uploading {} ({} bytes) in a single request", source.name(), source.size());

    let result = match abort {
        Some(handle) => {
            tokio::select! {
                biased;
                _ = handle.aborted() => {
                    tracing::info!("upload of {} aborted", source.name());
                    return Err(UploadError::Aborted);
                }
                result = request => result,
            }
        }
        None => request.await,
    };

    let response = result.map_err(|source| UploadError::Upload { source })?;
    progress.finish();
    tracing::info!("upload of {} completed", source.name());
    Ok(response)
}
