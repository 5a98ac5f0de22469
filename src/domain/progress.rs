use serde::Serialize;
/// ドメイン層: アップロード進捗
///
/// - `PercentTracker`: アップロード処理が呼び出し元へ通知するパーセンテージ（0〜100）を管理
/// - `UploadPhase` / `UploadProgress`: CLIが表示する処理段階のイベント
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// 進捗コールバック（0〜100 のパーセンテージ）
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// `done / total` を四捨五入したパーセンテージ
///
/// `total == 0` は完了済みとして 100 を返す。
pub fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = u128::from(done.min(total));
    let total = u128::from(total);
    ((done * 100 + total / 2) / total) as u8
}

/// 単調非減少なパーセンテージ通知
///
/// 完了数（チャンク数 or バイト数）から値を計算し、
/// 前回通知した値より小さくならないようにコールバックを呼び出す。
pub struct PercentTracker {
    callback: Option<ProgressFn>,
    completed_chunks: AtomicU64,
    last_reported: Mutex<u8>,
}

impl PercentTracker {
    pub fn new(callback: Option<ProgressFn>) -> Self {
        Self {
            callback,
            completed_chunks: AtomicU64::new(0),
            last_reported: Mutex::new(0),
        }
    }

    /// チャンク1つの完了を記録して通知
    pub fn chunk_completed(&self, total_chunks: u64) -> u8 {
        let completed = self.completed_chunks.fetch_add(1, Ordering::SeqCst) + 1;
        self.report(percent(completed, total_chunks))
    }

    /// 送信済みバイト数を通知
    pub fn bytes_sent(&self, sent: u64, total: u64) -> u8 {
        self.report(percent(sent, total))
    }

    /// 完了（100）を通知
    pub fn finish(&self) -> u8 {
        self.report(100)
    }

    /// これまでに完了したチャンク数
    pub fn completed_chunks(&self) -> u64 {
        self.completed_chunks.load(Ordering::SeqCst)
    }

    fn report(&self, value: u8) -> u8 {
        // ロックを保持したままコールバックを呼び、通知順と値の順序を一致させる
        let mut last = self
            .last_reported
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = (*last).max(value);
        if let Some(callback) = &self.callback {
            callback(*last);
        }
        *last
    }
}

/// アップロード方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    /// init → chunk × N → complete
    Chunked,
    /// 単一の multipart POST
    Simple,
}

/// アップロード処理の各段階を表すイベント
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum UploadPhase {
    /// ファイル検証開始
    ValidatingFile { file_path: String },

    /// ファイル検証完了
    FileValidated {
        file_name: String,
        size_bytes: u64,
        mime_type: String,
    },

    /// 転送開始
    UploadStarted {
        file_name: String,
        mode: UploadMode,
        total_chunks: u64,
    },

    /// 転送中
    Transferring { percent: u8 },

    /// アップロード処理完了
    Completed { file_name: String },
}

/// アップロード進捗情報
#[derive(Debug, Clone, Serialize)]
pub struct UploadProgress {
    /// 処理段階
    pub phase: UploadPhase,
    /// イベント発生時刻
    #[serde(skip)]
    #[allow(dead_code)]
    pub timestamp: SystemTime,
}

impl UploadProgress {
    pub fn new(phase: UploadPhase) -> Self {
        Self {
            phase,
            timestamp: SystemTime::now(),
        }
    }
}
