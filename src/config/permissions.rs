/// ファイルパーミッション管理モジュール
///
/// 認証情報（Bearerトークン / Basic認証のパスワード）を含む config.toml を
/// 所有者のみが読み書きできるようにします。
///
/// Unix系 (Linux, macOS): 0600 (rw-------)
/// その他: 何もしない（OS既定のユーザープロファイル保護に任せる）
use crate::config::error::ConfigError;
use std::path::Path;

/// 認証情報ファイルを所有者専用にする
///
/// # Errors
/// ファイルが存在しない場合、またはパーミッション設定に失敗した場合に ConfigError を返します。
pub fn restrict_to_owner(file_path: &Path) -> Result<(), ConfigError> {
    if !file_path.is_file() {
        return Err(ConfigError::file_system(
            format!("Config file not found: {}", file_path.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "File does not exist"),
        ));
    }

    apply_owner_only(file_path)
}

#[cfg(unix)]
fn apply_owner_only(file_path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(file_path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
        ConfigError::file_system(
            format!(
                "Failed to set permissions (0600) for config file: {}",
                file_path.display()
            ),
            e,
        )
    })
}

#[cfg(not(unix))]
fn apply_owner_only(_file_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}
