/// ステータスコマンド
///
/// 保存されている認証情報と既定のアップロードURLを表示します。
/// サーバーへの疎通確認は行いません。
use crate::api::auth::AuthManager;
use crate::commands::result::{CommandResult, StatusResult};
use crate::config::user::UserConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// ステータスコマンドを実行
pub async fn execute() -> Result<CommandResult> {
    let config_path = UserConfig::config_path()?;
    status_at(&config_path)
}

fn status_at(config_path: &Path) -> Result<CommandResult> {
    let config = UserConfig::load_from(config_path)
        .context("Failed to load configuration file")?;

    let manager = config.auth.clone().map(AuthManager::new);

    Ok(CommandResult::Status(StatusResult {
        is_authenticated: manager.is_some(),
        scheme: manager.as_ref().map(|m| m.scheme().to_string()),
        identity: manager.as_ref().map(AuthManager::get_masked_identity),
        upload_url: config.upload_url,
        config_path: config_path.display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use tempfile::TempDir;

    #[test]
    fn test_status_without_credentials() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        match status_at(&path).unwrap() {
            CommandResult::Status(r) => {
                assert!(!r.is_authenticated);
                assert!(r.identity.is_none());
                assert!(r.upload_url.is_none());
            }
            other => panic!("Expected status result, got {:?}", other),
        }
    }

    #[test]
    fn test_status_masks_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = UserConfig {
            upload_url: Some("https://example.com/uploads".to_string()),
            auth: Some(AuthConfig::Bearer {
                token: "abcd1234567890wxyz".to_string(),
            }),
            ..UserConfig::default()
        };
        config.save_to(&path).unwrap();

        match status_at(&path).unwrap() {
            CommandResult::Status(r) => {
                assert!(r.is_authenticated);
                assert_eq!(r.scheme.as_deref(), Some("bearer"));
                assert_eq!(r.identity.as_deref(), Some("abcd***wxyz"));
                assert_eq!(r.upload_url.as_deref(), Some("https://example.com/uploads"));
            }
            other => panic!("Expected status result, got {:?}", other),
        }
    }
}
