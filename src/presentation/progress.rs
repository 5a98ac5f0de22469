/// プレゼンテーション層: アップロード進捗表示
///
/// ドメイン層の`UploadProgress`をUI表示に適した形式に変換し、
/// 人間向け（stderr）または機械向け（stdout, JSON Lines）に出力します。
use crate::config::BYTES_PER_MB;
use crate::domain::progress::{UploadMode, UploadPhase, UploadProgress};
use std::io::Write;
use tokio::sync::mpsc::UnboundedReceiver;

/// 進捗表示のカテゴリ
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressCategory {
    Validation,
    Upload,
    Completed,
}

/// プレゼンテーション層用の進捗情報
#[derive(Debug, Clone)]
pub struct DisplayProgress {
    /// 表示用メッセージ
    pub message: String,
    pub category: ProgressCategory,
    /// 転送中の表示は同じ行を上書きする
    pub inline: bool,
}

impl DisplayProgress {
    pub fn new(message: String, category: ProgressCategory) -> Self {
        Self {
            message,
            category,
            inline: false,
        }
    }

    fn inline(mut self) -> Self {
        self.inline = true;
        self
    }
}

impl From<&UploadProgress> for DisplayProgress {
    fn from(progress: &UploadProgress) -> Self {
        match &progress.phase {
            UploadPhase::ValidatingFile { file_path } => DisplayProgress::new(
                format!("Validating file: {}", file_path),
                ProgressCategory::Validation,
            ),
            UploadPhase::FileValidated {
                file_name,
                size_bytes,
                mime_type,
            } => format_file_validated(file_name, *size_bytes, mime_type),
            UploadPhase::UploadStarted {
                file_name,
                mode,
                total_chunks,
            } => format_upload_started(file_name, *mode, *total_chunks),
            UploadPhase::Transferring { percent } => {
                DisplayProgress::new(format!("Uploading... {:>3}%", percent), ProgressCategory::Upload)
                    .inline()
            }
            UploadPhase::Completed { file_name } => DisplayProgress::new(
                format!("Uploaded: {}", file_name),
                ProgressCategory::Completed,
            ),
        }
    }
}

fn format_file_validated(file_name: &str, size_bytes: u64, mime_type: &str) -> DisplayProgress {
    let size_mb = size_bytes as f64 / BYTES_PER_MB as f64;
    DisplayProgress::new(
        format!("File validated: {} ({:.2} MB, {})", file_name, size_mb, mime_type),
        ProgressCategory::Validation,
    )
}

fn format_upload_started(file_name: &str, mode: UploadMode, total_chunks: u64) -> DisplayProgress {
    let message = match mode {
        UploadMode::Chunked => format!("Uploading {} in {} chunks", file_name, total_chunks),
        UploadMode::Simple => format!("Uploading {} in a single request", file_name),
    };
    DisplayProgress::new(message, ProgressCategory::Upload)
}

/// 進捗イベントを受信して表示する
///
/// 同じ転送率の重複通知は1回だけ表示する。送信側がすべて閉じると終了する。
pub async fn render_progress(mut rx: UnboundedReceiver<UploadProgress>, machine_output: bool) {
    let mut last_percent = None;
    let mut inline_open = false;

    while let Some(progress) = rx.recv().await {
        if let UploadPhase::Transferring { percent } = progress.phase {
            if last_percent == Some(percent) {
                continue;
            }
            last_percent = Some(percent);
        }

        if machine_output {
            if let Ok(json) = serde_json::to_string(&progress_json(&progress)) {
                println!("{}", json);
            }
            continue;
        }

        let display = DisplayProgress::from(&progress);
        if display.inline {
            eprint!("\r{}", display.message);
            let _ = std::io::stderr().flush();
            inline_open = true;
        } else {
            if inline_open {
                eprintln!();
                inline_open = false;
            }
            eprintln!("{}", display.message);
        }
    }

    if inline_open {
        eprintln!();
    }
}

/// 機械向けの進捗行
fn progress_json(progress: &UploadProgress) -> serde_json::Value {
    serde_json::json!({
        "type": "progress",
        "progress": &progress.phase,
    })
}
