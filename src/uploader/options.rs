/// アップロード設定
///
/// デフォルト値はビルド時設定（APP_CONFIG.upload）から取り、
/// ユーザー設定と呼び出し元の指定で上書きする。
use crate::config::APP_CONFIG;
use crate::config::app::UploadConfig;
use crate::config::user::UploadOverrides;
use crate::domain::error::DomainError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 進行中のアップロードを中断するハンドル
///
/// クローンしたハンドルはすべて同じアップロードを指す。
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    token: CancellationToken,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 中断を要求する
    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 中断が要求されるまで待つ
    pub async fn aborted(&self) {
        self.token.cancelled().await;
    }
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// 1チャンクあたりのバイト数
    pub chunk_size: u64,
    /// 1バッチで同時に送るチャンク数
    pub max_concurrent: usize,
    /// チャンクごとの最大試行回数（0 は 1 として扱う）
    pub retry_attempts: u32,
    /// リトライ待機の基準時間（n 回目の失敗後に `retry_delay * n` 待つ）
    pub retry_delay: Duration,
    /// smart_upload がチャンク分割を選ぶサイズ（これを超える場合）
    pub chunk_threshold: u64,
    /// 中断ハンドル
    pub abort: Option<AbortHandle>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self::from_config(&APP_CONFIG.upload)
    }
}

impl UploadOptions {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            max_concurrent: config.max_concurrent,
            retry_attempts: config.retry_attempts,
            retry_delay: config.retry_delay(),
            chunk_threshold: config.chunk_threshold,
            abort: None,
        }
    }

    /// ユーザー設定の上書き値を適用
    pub fn with_overrides(mut self, overrides: &UploadOverrides) -> Self {
        if let Some(chunk_size) = overrides.chunk_size {
            self.chunk_size = chunk_size;
        }
        if let Some(max_concurrent) = overrides.max_concurrent {
            self.max_concurrent = max_concurrent;
        }
        if let Some(retry_attempts) = overrides.retry_attempts {
            self.retry_attempts = retry_attempts;
        }
        if let Some(retry_delay_ms) = overrides.retry_delay_ms {
            self.retry_delay = Duration::from_millis(retry_delay_ms);
        }
        if let Some(chunk_threshold) = overrides.chunk_threshold {
            self.chunk_threshold = chunk_threshold;
        }
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn with_chunk_threshold(mut self, chunk_threshold: u64) -> Self {
        self.chunk_threshold = chunk_threshold;
        self
    }

    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    /// 実際に行う試行回数
    pub fn attempts(&self) -> u32 {
        self.retry_attempts.max(1)
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortHandle::is_aborted)
    }

    /// 設定値を検証
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::invalid_options(
                "chunk_size",
                "must be greater than 0",
            ));
        }
        if self.max_concurrent == 0 {
            return Err(DomainError::invalid_options(
                "max_concurrent",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}
