//! チャンク分割アップロード
//!
//! `{uploadUrl}/init` → `{uploadUrl}/chunk` × N → `{uploadUrl}/complete` の順に送信し、
//! 途中で失敗した場合は `{uploadUrl}/cleanup` でサーバー側のセッションを破棄する。
//!
//! チャンクは `max_concurrent` 個ずつのバッチで送る。バッチ内は同時に送信し、
//! バッチ内のすべてのチャンクが確定（成功またはリトライ切れ）してから次のバッチに進む。

use crate::api::transport::UploadTransport;
use crate::api::types::{CleanupRequest, CompleteRequest, FormFile, InitRequest, InitResponse, UploadForm};
use crate::domain::chunk::{ChunkSpec, UploadedChunk, plan_chunks, sorted_chunk_numbers};
use crate::domain::progress::{PercentTracker, ProgressFn};
use crate::domain::session::{SessionState, UploadSession};
use crate::uploader::error::{CleanupError, UploadError};
use crate::uploader::options::UploadOptions;
use crate::uploader::source::UploadSource;
use futures::future::join_all;
use reqwest::header::HeaderMap;

/// プロトコルのエンドポイント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub init: String,
    pub chunk: String,
    pub complete: String,
    pub cleanup: String,
}

impl Endpoints {
    pub fn new(upload_url: &str) -> Self {
        let base = upload_url.trim_end_matches('/');
        Self {
            init: format!("{}/init", base),
            chunk: format!("{}/chunk", base),
            complete: format!("{}/complete", base),
            cleanup: format!("{}/cleanup", base),
        }
    }
}

/// 1回のチャンクアップロードで共有する値
struct ChunkContext<'a, T, S> {
    transport: &'a T,
    source: &'a S,
    endpoints: &'a Endpoints,
    options: &'a UploadOptions,
    session: &'a UploadSession,
    progress: &'a PercentTracker,
    headers: &'a HeaderMap,
}

/// ファイルをチャンクに分割してアップロードする
///
/// 成功時は `/complete` のレスポンスボディを返す。
/// 失敗時は `/cleanup` を一度だけ呼び出してから、元のエラーを返す。
pub async fn upload_in_chunks<T, S>(
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
    options.validate()?;

    let endpoints = Endpoints::new(upload_url);
    let progress = PercentTracker::new(on_progress);
    let mut session = UploadSession::new(
        source.name(),
        source.size(),
        source.mime_type(),
        options.chunk_size,
    );

    tracing::info!(
        upload_id = %session.upload_id,
        "starting chunked upload of {} ({} bytes, {} chunks)",
        session.file_name,
        session.file_size,
        session.total_chunks
    );

    match run_session(transport, source, &endpoints, options, &progress, headers, &mut session).await {
        Ok(result) => {
            session.transition(SessionState::Done);
            progress.finish();
            tracing::info!(upload_id = %session.upload_id, "upload of {} completed", session.file_name);
            Ok(result)
        }
        Err(error) => {
            tracing::warn!(upload_id = %session.upload_id, "upload failed: {}", error);
            session.transition(SessionState::Failing);
            session.transition(SessionState::CleaningUp);
            cleanup(transport, &endpoints, &session, headers).await;
            session.transition(SessionState::Failed);
            Err(error)
        }
    }
}

async fn run_session<T, S>(
    transport: &T,
    source: &S,
    endpoints: &Endpoints,
    options: &UploadOptions,
    progress: &PercentTracker,
    headers: &HeaderMap,
    session: &mut UploadSession,
) -> Result<serde_json::Value, UploadError>
where
    T: UploadTransport,
    S: UploadSource,
{
    session.transition(SessionState::Initializing);
    let init = InitRequest {
        file_name: session.file_name.clone(),
        file_size: session.file_size,
        total_chunks: session.total_chunks,
        upload_id: session.upload_id.clone(),
        mime_type: session.mime_type.clone(),
    };
    let response = transport
        .post_json(&endpoints.init, &init, headers)
        .await
        .map_err(|source| UploadError::Init { source })?;
    session.assign_session_id(InitResponse::from_body(response).session_id);

    session.transition(SessionState::UploadingChunks);
    let plan = plan_chunks(session.file_size, options.chunk_size);
    let mut uploaded = Vec::with_capacity(plan.len());

    {
        let context = ChunkContext {
            transport,
            source,
            endpoints,
            options,
            session,
            progress,
            headers,
        };

        for batch in plan.chunks(options.max_concurrent) {
            if options.is_aborted() {
                return Err(UploadError::Cancelled {
                    completed_chunks: progress.completed_chunks(),
                });
            }

            let results = join_all(batch.iter().map(|chunk| upload_chunk(&context, *chunk))).await;
            for result in results {
                uploaded.push(result?);
            }
        }
    }

    session.transition(SessionState::Completing);
    let complete = CompleteRequest {
        session_id: session.session_id.clone(),
        uploaded_chunks: sorted_chunk_numbers(&mut uploaded),
        file_name: session.file_name.clone(),
        file_size: session.file_size,
    };
    transport
        .post_json(&endpoints.complete, &complete, headers)
        .await
        .map_err(|source| UploadError::Complete {
            session_id: session.session_id.clone(),
            source,
        })
}

/// 1チャンクをリトライ付きで送信する
///
/// n 回目の失敗後、試行回数が残っていれば `retry_delay * n` 待ってから再送する。
async fn upload_chunk<T, S>(
    context: &ChunkContext<'_, T, S>,
    chunk: ChunkSpec,
) -> Result<UploadedChunk, UploadError>
where
    T: UploadTransport,
    S: UploadSource,
{
    let attempts = context.options.attempts();
    let mut attempt = 1;

    loop {
        match send_chunk(context, chunk).await {
            Ok(response) => {
                let percent = context.progress.chunk_completed(context.session.total_chunks);
                tracing::debug!(
                    "chunk {}/{} uploaded ({}%)",
                    chunk.chunk_number,
                    context.session.total_chunks,
                    percent
                );
                return Ok(UploadedChunk {
                    chunk_number: chunk.chunk_number,
                    size: chunk.len(),
                    response,
                });
            }
            Err(error) if attempt < attempts => {
                let delay = context.options.retry_delay * attempt;
                tracing::warn!(
                    "chunk {} failed (attempt {}/{}), retrying in {:?}: {}",
                    chunk.chunk_number,
                    attempt,
                    attempts,
                    delay,
                    error
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(source) => {
                return Err(UploadError::Chunk {
                    chunk_number: chunk.chunk_number,
                    attempts: attempt,
                    source,
                });
            }
        }
    }
}

/// チャンクを読み出して1回だけ送信する
///
/// バイト列は試行ごとに読み出し、送信後に破棄する。
async fn send_chunk<T, S>(
    context: &ChunkContext<'_, T, S>,
    chunk: ChunkSpec,
) -> Result<serde_json::Value, crate::api::error::InfraError>
where
    T: UploadTransport,
    S: UploadSource,
{
    let data = context.source.read_range(chunk.start, chunk.end).await?;
    let form = UploadForm::new(FormFile {
        field: "chunk".to_string(),
        file_name: context.session.file_name.clone(),
        mime_type: "application/octet-stream".to_string(),
        data,
    })
    .text("chunkNumber", chunk.chunk_number)
    .text("totalChunks", context.session.total_chunks)
    .text("sessionId", &context.session.session_id);

    context
        .transport
        .post_form(&context.endpoints.chunk, form, context.headers, None)
        .await
}

/// サーバー側のセッションを破棄する（ベストエフォート）
async fn cleanup<T: UploadTransport>(
    transport: &T,
    endpoints: &Endpoints,
    session: &UploadSession,
    headers: &HeaderMap,
) {
    let request = CleanupRequest {
        upload_id: session.upload_id.clone(),
    };
    if let Err(source) = transport.post_json(&endpoints.cleanup, &request, headers).await {
        let error = CleanupError {
            upload_id: session.upload_id.clone(),
            source,
        };
        tracing::warn!("{}: {}", error, error.source);
    }
}
