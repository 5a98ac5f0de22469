/// ドメイン層: アップロードセッション
///
/// 1回のアップロード呼び出しの間だけ存在するセッション情報と、その状態遷移。
use crate::domain::chunk::total_chunks;
use std::fmt;

/// セッションの状態
///
/// 正常系: `Idle → Initializing → UploadingChunks → Completing → Done`
/// 異常系: `Idle` 以外の非終端状態から `Failing → CleaningUp → Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Initializing,
    UploadingChunks,
    Completing,
    Done,
    Failing,
    CleaningUp,
    Failed,
}

impl SessionState {
    /// `next` への遷移が許されるか
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Initializing)
                | (Initializing, UploadingChunks)
                | (UploadingChunks, Completing)
                | (Completing, Done)
                | (Initializing | UploadingChunks | Completing, Failing)
                | (Failing, CleaningUp)
                | (CleaningUp, Failed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::UploadingChunks => "uploading_chunks",
            Self::Completing => "completing",
            Self::Done => "done",
            Self::Failing => "failing",
            Self::CleaningUp => "cleaning_up",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// クライアント側で生成するアップロードID
///
/// ミリ秒タイムスタンプ + UUIDv4。同一クライアントからの同時アップロードでも衝突しない。
pub fn generate_upload_id() -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}

/// 1回のファイル転送
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub upload_id: String,
    /// サーバーが割り当てたID（未割り当ての場合は upload_id）
    pub session_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub total_chunks: u64,
    state: SessionState,
}

impl UploadSession {
    pub fn new(
        file_name: impl Into<String>,
        file_size: u64,
        mime_type: impl Into<String>,
        chunk_size: u64,
    ) -> Self {
        let upload_id = generate_upload_id();
        Self {
            session_id: upload_id.clone(),
            upload_id,
            file_name: file_name.into(),
            file_size,
            mime_type: mime_type.into(),
            total_chunks: total_chunks(file_size, chunk_size),
            state: SessionState::Idle,
        }
    }

    /// サーバーから受け取ったセッションIDを設定
    ///
    /// `None` または空文字列の場合は upload_id をそのまま使う。
    pub fn assign_session_id(&mut self, session_id: Option<String>) {
        match session_id {
            Some(id) if !id.is_empty() => self.session_id = id,
            _ => {
                tracing::debug!(
                    "server did not return a sessionId, using uploadId {}",
                    self.upload_id
                );
                self.session_id = self.upload_id.clone();
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 状態を遷移させる
    ///
    /// 許されない遷移は無視して false を返す。
    pub fn transition(&mut self, next: SessionState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::debug!(
                upload_id = %self.upload_id,
                "ignored invalid session transition {} -> {}",
                self.state,
                next
            );
            return false;
        }
        tracing::trace!(upload_id = %self.upload_id, "session {} -> {}", self.state, next);
        self.state = next;
        true
    }
}
