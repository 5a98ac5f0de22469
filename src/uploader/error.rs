/// アップロード処理のエラー定義
///
/// どの段階（init / chunk / complete / 単発アップロード）で失敗したかを型で表し、
/// 原因となったインフラ層のエラーを #[source] で保持する。
use crate::api::error::InfraError;
use crate::domain::error::DomainError;
use crate::error_severity::ErrorSeverity;
use std::fmt;
use thiserror::Error;

/// 失敗した段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Options,
    Init,
    Chunk,
    Complete,
    Upload,
    Aborted,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Options => "options",
            Self::Init => "init",
            Self::Chunk => "chunk",
            Self::Complete => "complete",
            Self::Upload => "upload",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum UploadError {
    /// アップロード設定が不正（リクエスト送信前）
    #[error(transparent)]
    InvalidOptions(#[from] DomainError),

    /// セッションを作成できなかった
    #[error("failed to initialize upload session")]
    Init {
        #[source]
        source: InfraError,
    },

    /// リトライを使い切ってもチャンクを送信できなかった
    #[error("failed to upload chunk {chunk_number} after {attempts} attempt(s)")]
    Chunk {
        chunk_number: u64,
        attempts: u32,
        #[source]
        source: InfraError,
    },

    /// 全チャンク送信後の完了処理に失敗した
    #[error("failed to complete upload session {session_id}")]
    Complete {
        session_id: String,
        #[source]
        source: InfraError,
    },

    /// 単発アップロードに失敗した
    #[error("upload failed")]
    Upload {
        #[source]
        source: InfraError,
    },

    /// 単発アップロードが中断された
    #[error("upload aborted")]
    Aborted,

    /// チャンクアップロードがバッチの間で中断された
    #[error("upload cancelled after {completed_chunks} chunk(s)")]
    Cancelled { completed_chunks: u64 },
}

impl UploadError {
    /// 失敗した段階
    pub fn stage(&self) -> UploadStage {
        match self {
            Self::InvalidOptions(_) => UploadStage::Options,
            Self::Init { .. } => UploadStage::Init,
            Self::Chunk { .. } => UploadStage::Chunk,
            Self::Complete { .. } => UploadStage::Complete,
            Self::Upload { .. } => UploadStage::Upload,
            Self::Aborted | Self::Cancelled { .. } => UploadStage::Aborted,
        }
    }

    /// 失敗したチャンク番号（チャンク送信エラーの場合のみ）
    pub fn chunk_number(&self) -> Option<u64> {
        match self {
            Self::Chunk { chunk_number, .. } => Some(*chunk_number),
            _ => None,
        }
    }

    /// 原因となったHTTPステータスコード
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Init { source }
            | Self::Chunk { source, .. }
            | Self::Complete { source, .. }
            | Self::Upload { source } => source.status_code(),
            _ => None,
        }
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidOptions(error) => error.severity(),
            Self::Aborted | Self::Cancelled { .. } => ErrorSeverity::Interrupted,
            _ => ErrorSeverity::SystemError,
        }
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::InvalidOptions(error) => error.hint(),
            Self::Init { .. } => Some(
                "The upload session could not be created. Check the upload URL and your credentials.",
            ),
            Self::Chunk { .. } => Some(
                "A part of the file could not be transferred. Check your connection and retry the whole upload.",
            ),
            Self::Complete { .. } => Some(
                "All parts were sent but the server did not finalize the file. It may still hold the data; check the server before uploading again.",
            ),
            Self::Upload { .. } => Some("Check the upload URL and your connection."),
            Self::Aborted | Self::Cancelled { .. } => None,
        }
    }
}

/// クリーンアップ失敗
///
/// 呼び出し元には返さず、ログにのみ記録する。
#[derive(Error, Debug)]
#[error("failed to clean up upload {upload_id}")]
pub struct CleanupError {
    pub upload_id: String,
    #[source]
    pub source: InfraError,
}
