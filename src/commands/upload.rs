/// アップロードコマンド
///
/// ファイルを検証し、サイズに応じてチャンク分割アップロードまたは単発アップロードを行う。
/// このレイヤーでは anyhow::Result を返し、ドメイン層・インフラ層・アップロード層の
/// エラーを集約する。
use crate::api::auth::AuthManager;
use crate::api::client::ApiClient;
use crate::commands::result::{CommandResult, UploadResult};
use crate::config::error::ConfigError;
use crate::config::user::{self, UploadOverrides, UserConfig};
use crate::domain::chunk::total_chunks;
use crate::domain::progress::{ProgressFn, UploadMode, UploadPhase, UploadProgress};
use crate::presentation::input;
use crate::uploader::{AbortHandle, FileSource, UploadOptions, UploadSource, select_mode, smart_upload};
use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// アップロードコマンドの入力
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file_path: String,
    /// 省略時はユーザー設定の upload_url
    pub upload_url: Option<String>,
    /// `Name: value` 形式の追加ヘッダー
    pub headers: Vec<String>,
    /// コマンドラインからの上書き値（ユーザー設定より優先）
    pub overrides: UploadOverrides,
}

/// アップロードコマンドを実行する
///
/// `progress_tx` が指定された場合、処理段階と転送率を送信する。
/// `abort` が発火すると、単発アップロードはリクエストを破棄し、
/// チャンク分割アップロードは次のバッチの前で停止する。
pub async fn execute(
    request: UploadRequest,
    progress_tx: Option<UnboundedSender<UploadProgress>>,
    abort: AbortHandle,
) -> Result<CommandResult> {
    let user_config = UserConfig::load()
        .context("Failed to load user configuration. Please check your config.toml file.")?;

    let upload_url = resolve_upload_url(request.upload_url.as_deref(), &user_config)?;
    let options = build_options(&user_config, &request.overrides).with_abort(abort);
    options.validate()?;
    let headers = build_headers(&user_config, &request.headers)?;

    send_progress(
        &progress_tx,
        UploadPhase::ValidatingFile {
            file_path: request.file_path.clone(),
        },
    );
    let source = FileSource::open(&request.file_path).context("File validation failed")?;
    send_progress(
        &progress_tx,
        UploadPhase::FileValidated {
            file_name: source.name().to_string(),
            size_bytes: source.size(),
            mime_type: source.mime_type().to_string(),
        },
    );

    let mode = select_mode(source.size(), options.chunk_threshold);
    let chunks = match mode {
        UploadMode::Chunked => total_chunks(source.size(), options.chunk_size),
        UploadMode::Simple => 1,
    };
    send_progress(
        &progress_tx,
        UploadPhase::UploadStarted {
            file_name: source.name().to_string(),
            mode,
            total_chunks: chunks,
        },
    );

    let client = ApiClient::from_config()?;
    let response = smart_upload(
        &client,
        &source,
        &upload_url,
        &options,
        percent_callback(&progress_tx),
        &headers,
    )
    .await?;

    send_progress(
        &progress_tx,
        UploadPhase::Completed {
            file_name: source.name().to_string(),
        },
    );

    Ok(CommandResult::Upload(UploadResult {
        file_path: request.file_path,
        file_name: source.name().to_string(),
        file_size: source.size(),
        mime_type: source.mime_type().to_string(),
        mode,
        total_chunks: chunks,
        response,
    }))
}

/// アップロードURLを決定する（コマンドライン > ユーザー設定）
fn resolve_upload_url(cli_url: Option<&str>, config: &UserConfig) -> Result<String, ConfigError> {
    let url = cli_url
        .map(str::to_string)
        .or_else(|| config.upload_url.clone())
        .ok_or_else(|| {
            ConfigError::validation_error(
                "No upload URL given. Pass --url or run 'chunkup login --url <URL>'.",
            )
        })?;
    user::validate_upload_url(&url)?;
    Ok(url)
}

/// ビルド時設定 → ユーザー設定 → コマンドラインの順に上書きする
fn build_options(config: &UserConfig, cli: &UploadOverrides) -> UploadOptions {
    UploadOptions::default()
        .with_overrides(&config.upload)
        .with_overrides(cli)
}

/// 保存済みの認証情報と `--header` の指定からリクエストヘッダーを作る
///
/// 同名のヘッダーは `--header` の指定が優先される。
fn build_headers(config: &UserConfig, extra: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(auth) = &config.auth {
        AuthManager::new(auth.clone())
            .apply(&mut headers)
            .context("Stored credentials cannot be used as an Authorization header")?;
    } else {
        tracing::debug!("no stored credentials, sending requests without Authorization");
    }

    headers.extend(input::parse_headers(extra)?);
    Ok(headers)
}

fn send_progress(tx: &Option<UnboundedSender<UploadProgress>>, phase: UploadPhase) {
    if let Some(tx) = tx {
        // 受信側が閉じていても処理は続行する
        let _ = tx.send(UploadProgress::new(phase));
    }
}

fn percent_callback(tx: &Option<UnboundedSender<UploadProgress>>) -> Option<ProgressFn> {
    let tx = tx.clone()?;
    Some(Arc::new(move |percent| {
        let _ = tx.send(UploadProgress::new(UploadPhase::Transferring { percent }));
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use reqwest::header::AUTHORIZATION;
    use std::time::Duration;

    #[test]
    fn test_cli_url_takes_precedence() {
        let config = UserConfig {
            upload_url: Some("https://config.example.com/uploads".to_string()),
            ..UserConfig::default()
        };
        assert_eq!(
            resolve_upload_url(Some("https://cli.example.com/up"), &config).unwrap(),
            "https://cli.example.com/up"
        );
        assert_eq!(
            resolve_upload_url(None, &config).unwrap(),
            "https://config.example.com/uploads"
        );
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let error = resolve_upload_url(None, &UserConfig::default()).unwrap_err();
        assert!(matches!(error, ConfigError::ValidationError { .. }));
        assert!(resolve_upload_url(Some("not a url"), &UserConfig::default()).is_err());
    }

    #[test]
    fn test_options_layering() {
        let config = UserConfig {
            upload: UploadOverrides {
                chunk_size: Some(2048),
                max_concurrent: Some(5),
                ..UploadOverrides::default()
            },
            ..UserConfig::default()
        };
        let cli = UploadOverrides {
            max_concurrent: Some(1),
            retry_delay_ms: Some(10),
            ..UploadOverrides::default()
        };

        let options = build_options(&config, &cli);
        assert_eq!(options.chunk_size, 2048);
        assert_eq!(options.max_concurrent, 1);
        assert_eq!(options.retry_delay, Duration::from_millis(10));
        assert_eq!(options.retry_attempts, 3);
    }

    #[test]
    fn test_headers_combine_auth_and_extra() {
        let config = UserConfig {
            auth: Some(AuthConfig::Bearer {
                token: "stored".to_string(),
            }),
            ..UserConfig::default()
        };

        let headers = build_headers(&config, &["X-Course-Id: 7".to_string()]).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer stored");
        assert_eq!(headers.get("x-course-id").unwrap(), "7");

        let overridden =
            build_headers(&config, &["Authorization: Bearer other".to_string()]).unwrap();
        assert_eq!(overridden.get(AUTHORIZATION).unwrap(), "Bearer other");
    }

    #[test]
    fn test_percent_callback_sends_transferring_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let callback = percent_callback(&Some(tx)).unwrap();
        callback(40);

        let event = rx.try_recv().unwrap();
        assert!(matches!(event.phase, UploadPhase::Transferring { percent: 40 }));
        assert!(percent_callback(&None).is_none());
    }
}
