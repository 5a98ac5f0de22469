use crate::commands::{self, CommandResult};
use crate::commands::login::LoginOptions;
use crate::commands::upload::UploadRequest;
use crate::config::UploadOverrides;
use crate::presentation::{output, progress};
use crate::uploader::AbortHandle;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

/// CLI引数
#[derive(Parser, Debug)]
#[command(author, version, about = "Upload large files in chunks over HTTP")]
pub struct Cli {
    /// 機械可読JSONを stdout に出力する（成功・失敗・進捗のすべて）
    #[arg(long, global = true)]
    pub machine: bool,

    /// ログの詳細度（-v: info, -vv: debug, -vvv: trace）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store credentials for the upload server
    Login {
        /// Read credentials from standard input (bearer: 1 line, basic: 2 lines)
        #[arg(long)]
        stdin: bool,

        /// Use HTTP Basic authentication instead of a bearer token
        #[arg(long)]
        basic: bool,

        /// Default upload URL used when `upload --url` is omitted
        #[arg(long)]
        url: Option<String>,
    },

    /// Remove stored credentials
    Logout,

    /// Show stored credentials and default upload URL
    Status,

    /// Upload a file (chunked when larger than the threshold)
    Upload(UploadArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// File to upload
    pub file: String,

    /// Upload URL (base of /init, /chunk, /complete, /cleanup)
    #[arg(long)]
    pub url: Option<String>,

    /// Extra request header, "Name: value" (repeatable)
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Show upload progress
    #[arg(long)]
    pub progress: bool,

    /// Bytes per chunk
    #[arg(long)]
    pub chunk_size: Option<u64>,

    /// Chunks sent concurrently per batch
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Attempts per chunk before giving up
    #[arg(long)]
    pub retry_attempts: Option<u32>,

    /// Base delay between attempts in milliseconds (multiplied by the attempt number)
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Files larger than this many bytes are uploaded in chunks
    #[arg(long)]
    pub threshold: Option<u64>,
}

impl UploadArgs {
    fn into_request(self) -> UploadRequest {
        UploadRequest {
            file_path: self.file,
            upload_url: self.url,
            headers: self.headers,
            overrides: UploadOverrides {
                chunk_size: self.chunk_size,
                max_concurrent: self.max_concurrent,
                retry_attempts: self.retry_attempts,
                retry_delay_ms: self.retry_delay_ms,
                chunk_threshold: self.threshold,
            },
        }
    }
}

/// 解析済みの引数をコマンドにディスパッチし、結果を出力する
pub async fn run(cli: Cli) -> Result<()> {
    let machine_output = cli.machine;

    let result = match cli.command {
        Command::Login { stdin, basic, url } => {
            commands::login::execute(
                LoginOptions {
                    from_stdin: stdin,
                    basic,
                },
                url,
            )
            .await
            .context("Login command failed")?
        }
        Command::Logout => commands::logout::execute()
            .await
            .context("Logout command failed")?,
        Command::Status => commands::status::execute()
            .await
            .context("Status command failed")?,
        Command::Upload(args) => run_upload(args, machine_output)
            .await
            .context("Upload command failed")?,
    };

    output::output_result(&result, machine_output)
}

/// アップロードを実行する
///
/// Ctrl-C で中断ハンドルを発火させ、`--progress` 指定時は進捗を別タスクで表示する。
async fn run_upload(args: UploadArgs, machine_output: bool) -> Result<CommandResult> {
    let show_progress = args.progress;
    let abort = AbortHandle::new();

    let ctrl_c = {
        let abort = abort.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, aborting upload");
                abort.abort();
            }
        })
    };

    let (progress_tx, renderer) = if show_progress {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let renderer = tokio::spawn(progress::render_progress(rx, machine_output));
        (Some(tx), Some(renderer))
    } else {
        (None, None)
    };

    let result = commands::upload::execute(args.into_request(), progress_tx, abort).await;

    ctrl_c.abort();
    if let Some(renderer) = renderer {
        // 送信側はすべて drop 済みなので、残りのイベントを出力して終了する
        let _ = renderer.await;
    }

    result
}
