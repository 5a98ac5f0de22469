/// ログアウトコマンド
///
/// 保存されている認証情報を削除します。既定のアップロードURLと上書き設定は残します。
use crate::commands::result::{CommandResult, LogoutResult};
use crate::config::user::UserConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// ログアウトコマンドを実行
pub async fn execute() -> Result<CommandResult> {
    let config_path = UserConfig::config_path()?;
    logout_at(&config_path)
}

fn logout_at(config_path: &Path) -> Result<CommandResult> {
    let mut config = UserConfig::load_from(config_path)
        .context("Failed to load configuration file")?;

    let was_logged_in = config.has_auth();
    if !was_logged_in {
        return Ok(CommandResult::Logout(LogoutResult { was_logged_in: false }));
    }

    config.clear_auth();
    config
        .save_to(config_path)
        .context("Failed to save configuration file")?;

    tracing::debug!("credentials removed from {}", config_path.display());
    Ok(CommandResult::Logout(LogoutResult { was_logged_in: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use tempfile::TempDir;

    #[test]
    fn test_logout_removes_credentials_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = UserConfig {
            upload_url: Some("https://example.com/uploads".to_string()),
            ..UserConfig::default()
        };
        config.set_auth(AuthConfig::Bearer {
            token: "secret-token".to_string(),
        });
        config.save_to(&path).unwrap();

        let result = logout_at(&path).unwrap();
        assert!(matches!(result, CommandResult::Logout(LogoutResult { was_logged_in: true })));

        let reloaded = UserConfig::load_from(&path).unwrap();
        assert!(!reloaded.has_auth());
        assert_eq!(reloaded.upload_url.as_deref(), Some("https://example.com/uploads"));
    }

    #[test]
    fn test_logout_without_credentials() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let result = logout_at(&path).unwrap();
        assert!(matches!(result, CommandResult::Logout(LogoutResult { was_logged_in: false })));
    }
}
