/// ログインコマンド
///
/// アップロードサーバーの認証情報（Bearer トークンまたは Basic 認証）と、
/// 任意で既定のアップロードURLを config.toml に保存します。
use crate::api::auth::AuthManager;
use crate::commands::result::{CommandResult, LoginResult};
use crate::config::user::{self, UserConfig};
use crate::config::AuthConfig;
use crate::presentation::input;
use anyhow::{Context, Result};
use std::path::Path;

/// ログイン時の入力方法
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginOptions {
    /// stdin から読み取る（対話なし）
    pub from_stdin: bool,
    /// Basic 認証（false なら Bearer トークン）
    pub basic: bool,
}

/// ログインコマンドを実行
pub async fn execute(options: LoginOptions, upload_url: Option<String>) -> Result<CommandResult> {
    let credentials = if options.from_stdin {
        input::read_credentials_from_stdin(options.basic)?
    } else {
        input::read_credentials_interactive(options.basic)?
    };

    let config_path = UserConfig::config_path()?;
    save_login(&config_path, credentials, upload_url)
}

fn save_login(
    config_path: &Path,
    credentials: AuthConfig,
    upload_url: Option<String>,
) -> Result<CommandResult> {
    if let Some(url) = &upload_url {
        user::validate_upload_url(url)?;
    }

    let mut config = UserConfig::load_from(config_path)
        .context("Failed to load configuration file")?;
    let was_logged_in = config.has_auth();

    let scheme = AuthManager::new(credentials.clone()).scheme().to_string();
    config.set_auth(credentials);
    if upload_url.is_some() {
        config.upload_url = upload_url;
    }

    config
        .save_to(config_path)
        .context("Failed to save configuration file")?;

    Ok(CommandResult::Login(LoginResult {
        was_logged_in,
        scheme,
        upload_url: config.upload_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ConfigError;
    use tempfile::TempDir;

    #[test]
    fn test_login_saves_credentials_and_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let result = save_login(
            &path,
            AuthConfig::Basic {
                username: "instructor".to_string(),
                password: "pw".to_string(),
            },
            Some("https://example.com/uploads".to_string()),
        )
        .unwrap();

        match result {
            CommandResult::Login(r) => {
                assert!(!r.was_logged_in);
                assert_eq!(r.scheme, "basic");
                assert_eq!(r.upload_url.as_deref(), Some("https://example.com/uploads"));
            }
            other => panic!("Expected login result, got {:?}", other),
        }

        let saved = UserConfig::load_from(&path).unwrap();
        assert!(matches!(saved.get_auth(), Ok(AuthConfig::Basic { .. })));
    }

    #[test]
    fn test_login_twice_reports_update_and_keeps_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let bearer = |token: &str| AuthConfig::Bearer {
            token: token.to_string(),
        };

        save_login(&path, bearer("first"), Some("https://example.com/a".to_string())).unwrap();
        let result = save_login(&path, bearer("second"), None).unwrap();

        match result {
            CommandResult::Login(r) => {
                assert!(r.was_logged_in);
                assert_eq!(r.upload_url.as_deref(), Some("https://example.com/a"));
            }
            other => panic!("Expected login result, got {:?}", other),
        }
    }

    #[test]
    fn test_login_rejects_invalid_url_before_saving() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let error = save_login(
            &path,
            AuthConfig::Bearer {
                token: "t".to_string(),
            },
            Some("ftp://example.com".to_string()),
        )
        .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<ConfigError>(),
            Some(ConfigError::ValidationError { .. })
        ));
        assert!(!path.exists());
    }
}
