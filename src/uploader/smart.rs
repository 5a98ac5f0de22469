//! サイズに応じたアップロード方式の選択

use crate::api::transport::UploadTransport;
use crate::domain::progress::{ProgressFn, UploadMode};
use crate::uploader::chunked::upload_in_chunks;
use crate::uploader::error::UploadError;
use crate::uploader::options::UploadOptions;
use crate::uploader::simple::upload_with_progress;
use crate::uploader::source::UploadSource;
use reqwest::header::HeaderMap;

/// しきい値を超えるファイルだけをチャンク分割する
pub fn select_mode(file_size: u64, chunk_threshold: u64) -> UploadMode {
    if file_size > chunk_threshold {
        UploadMode::Chunked
    } else {
        UploadMode::Simple
    }
}

/// ファイルサイズに応じてチャンク分割アップロードと単発アップロードを切り替える
///
/// 単発アップロードでは `options` のうち `abort` だけを使う。
pub async fn smart_upload<T, S>(
    transport: &T,
    source: &S,
    upload_url: &str,
    options: &UploadOptions,
    on_progress: Option<ProgressFn>,
    headers: &HeaderMap,
) -> Result<serde_json::Value, UploadError>
where
    T: UploadTransport,
    S: UploadSource,
{
    let mode = select_mode(source.size(), options.chunk_threshold);
    tracing::debug!(
        "{} is {} bytes (threshold {}), using {:?} upload",
        source.name(),
        source.size(),
        options.chunk_threshold,
        mode
    );

    match mode {
        UploadMode::Chunked => {
            upload_in_chunks(transport, source, upload_url, options, on_progress, headers).await
        }
        UploadMode::Simple => {
            upload_with_progress(
                transport,
                source,
                upload_url,
                on_progress,
                headers,
                options.abort.as_ref(),
            )
            .await
        }
    }
}
