use anyhow::Result;
use chunkup::api::error::InfraError;
use chunkup::cli::{self, Cli};
use chunkup::config::APP_CONFIG;
use chunkup::config::error::ConfigError;
use chunkup::domain::error::DomainError;
use chunkup::error_severity::ErrorSeverity;
use chunkup::uploader::UploadError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let machine_output = cli.machine;
    if let Err(e) = run(cli).await {
        handle_error(e, machine_output);
    }
}

/// アプリケーションのメイン処理
async fn run(cli: Cli) -> Result<()> {
    cli::run(cli).await
}

/// ログ出力の初期化（stderr）
///
/// フィルタの優先順位: RUST_LOG > -v の回数 > config.toml の logging.level
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => APP_CONFIG.logging.level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("chunkup={}", level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// エラーハンドリングとユーザーへの表示
///
/// anyhow::Error から元のエラー型を downcast して、
/// エラーの種類に応じた exit code とメッセージを決定する。
fn handle_error(error: anyhow::Error, machine_output: bool) {
    let severity = determine_severity(&error);
    let exit_code = severity.map_or(1, ErrorSeverity::exit_code);
    let hint = get_error_hint(&error);

    if machine_output {
        let causes: Vec<String> = error.chain().skip(1).map(|c| c.to_string()).collect();
        let json = serde_json::json!({
            "success": false,
            "error": error.to_string(),
            "causes": causes,
            "kind": severity.map(ErrorSeverity::kind),
            "retryable": severity.is_some_and(ErrorSeverity::is_retryable),
            "exit_code": exit_code,
            "hint": hint,
        });
        println!("{}", json);
        std::process::exit(exit_code);
    }

    eprintln!("Error: {}", error);

    // エラーチェーンを辿って詳細を表示
    let chain: Vec<_> = error.chain().skip(1).collect();
    if !chain.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            eprintln!("  {}: {}", i + 1, cause);
        }
    }

    if let Some(hint) = hint {
        eprintln!("\nHint: {}", hint);
    }

    std::process::exit(exit_code);
}

/// エラーチェーンから深刻度を決定（不明なエラーは None、終了コード 1）
fn determine_severity(error: &anyhow::Error) -> Option<ErrorSeverity> {
    error.chain().find_map(|cause| {
        if let Some(upload_err) = cause.downcast_ref::<UploadError>() {
            return Some(upload_err.severity());
        }
        if let Some(domain_err) = cause.downcast_ref::<DomainError>() {
            return Some(domain_err.severity());
        }
        if let Some(infra_err) = cause.downcast_ref::<InfraError>() {
            return Some(infra_err.severity());
        }
        cause
            .downcast_ref::<ConfigError>()
            .map(|config_err| config_err.severity())
    })
}

/// エラーに対するユーザー向けヒントを取得
fn get_error_hint(error: &anyhow::Error) -> Option<String> {
    for cause in error.chain() {
        if let Some(upload_err) = cause.downcast_ref::<UploadError>()
            && let Some(hint) = upload_err.hint()
        {
            return Some(hint.to_string());
        }

        if let Some(domain_err) = cause.downcast_ref::<DomainError>()
            && let Some(hint) = domain_err.hint()
        {
            return Some(hint.to_string());
        }

        if let Some(config_err) = cause.downcast_ref::<ConfigError>()
            && let Some(hint) = config_err.hint()
        {
            return Some(hint.to_string());
        }
    }

    None
}
