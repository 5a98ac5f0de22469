/// ユーザー設定モジュール
///
/// 実行時にユーザーディレクトリから読み込まれる動的設定を管理します。
/// Windows: C:\Users\<User>\AppData\Roaming\chunkup\config.toml
/// macOS:   /Users/<User>/Library/Application Support/chunkup/config.toml
/// Linux:   /home/<user>/.config/chunkup/config.toml
///
/// 初回起動時にデフォルト値から自動的にconfig.tomlを作成します。
use crate::config::error::ConfigError;
use crate::config::permissions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 認証設定
///
/// すべてのリクエストに付与する Authorization ヘッダーの元になります。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// `Authorization: Bearer <token>`
    Bearer { token: String },

    /// `Authorization: Basic base64(username:password)`
    Basic { username: String, password: String },
}

/// アップロード設定の上書き
///
/// 未指定の項目はビルド時設定（APP_CONFIG.upload）の値が使われます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_attempts: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_threshold: Option<u64>,
}

/// ユーザー設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// 既定のアップロードURL（`--url` 未指定時に使用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,

    /// アップロード設定の上書き
    #[serde(default)]
    pub upload: UploadOverrides,

    /// 認証情報
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

impl UserConfig {
    /// ユーザー設定ファイルのパスを取得
    ///
    /// # Errors
    /// 設定ディレクトリが取得できない場合に ConfigError::DirectoryNotFound を返します。
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .ok_or_else(|| ConfigError::directory_not_found("Failed to get user config directory"))
            .map(|config_dir| config_dir.join("chunkup").join("config.toml"))
    }

    /// ユーザー設定を読み込む
    ///
    /// 設定ファイルが存在しない場合は、デフォルトテンプレートから自動的に作成します。
    /// 読み込み後、自動的に検証を実行します（Fail Fast）。
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスからユーザー設定を読み込む
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to read config file: {}", config_path.display()),
                e,
            )
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::parse_error(
                format!("Failed to parse config file ({})", config_path.display()),
                e,
            )
        })?;

        config.validate()?;

        Ok(config)
    }

    /// デフォルト設定ファイルを作成
    fn create_default_config(config_path: &Path) -> Result<(), ConfigError> {
        Self::ensure_parent_dir(config_path)?;

        fs::write(config_path, Self::default_toml_content()).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to create default config file: {}", config_path.display()),
                e,
            )
        })
    }

    fn default_toml_content() -> &'static str {
        r#"# chunkup - User Configuration
# Credentials are set with 'chunkup login'

# Default upload endpoint (base URL of the chunked upload protocol)
# upload_url = "https://example.com/api/uploads"

# Per-user overrides of the upload defaults
[upload]
# chunk_size = 1048576
# max_concurrent = 3
# retry_attempts = 3
# retry_delay_ms = 1000
# chunk_threshold = 10485760
"#
    }

    fn ensure_parent_dir(config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::file_system(
                    format!("Failed to create config directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// ユーザー設定を保存する
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// 指定パスにユーザー設定を保存する
    ///
    /// 認証情報を含むため、保存後にパーミッションを所有者のみに制限します。
    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        Self::ensure_parent_dir(config_path)?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::serialize_error("Failed to serialize config", e))?;

        fs::write(config_path, content).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to write config file: {}", config_path.display()),
                e,
            )
        })?;

        permissions::restrict_to_owner(config_path)
    }

    /// ユーザー設定を検証
    ///
    /// # 検証内容
    /// - upload_url: http(s) の絶対URLであること
    /// - auth: 空文字列のフィールドがないこと
    /// - upload: 0 を指定できない項目が 0 でないこと
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.upload_url {
            validate_upload_url(url)?;
        }

        match &self.auth {
            Some(AuthConfig::Bearer { token }) => validate_auth_field(token, "token")?,
            Some(AuthConfig::Basic { username, password }) => {
                validate_auth_field(username, "username")?;
                validate_auth_field(password, "password")?;
            }
            None => {}
        }

        if self.upload.chunk_size == Some(0) {
            return Err(ConfigError::validation_error(
                "upload.chunk_size must be greater than 0",
            ));
        }
        if self.upload.max_concurrent == Some(0) {
            return Err(ConfigError::validation_error(
                "upload.max_concurrent must be greater than 0",
            ));
        }

        Ok(())
    }

    /// 認証情報を設定
    pub fn set_auth(&mut self, auth: AuthConfig) {
        self.auth = Some(auth);
    }

    /// 認証情報を取得
    ///
    /// # Errors
    /// 認証情報が設定されていない場合に ConfigError::TokenNotFound を返します。
    pub fn get_auth(&self) -> Result<&AuthConfig, ConfigError> {
        self.auth.as_ref().ok_or_else(|| {
            ConfigError::token_not_found(
                "Authentication credentials not found. Please run 'chunkup login' first.",
            )
        })
    }

    /// 認証情報が存在するかチェック
    pub fn has_auth(&self) -> bool {
        self.auth.is_some()
    }

    /// 認証情報を削除
    pub fn clear_auth(&mut self) {
        self.auth = None;
    }
}

fn validate_auth_field(value: &str, field_name: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation_error(format!(
            "Authentication {} cannot be empty. Please run 'chunkup login' again.",
            field_name
        )));
    }
    Ok(())
}

/// アップロードURLを検証
pub fn validate_upload_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| {
        ConfigError::validation_error(format!("Invalid upload URL '{}': {}", url, e))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::validation_error(format!(
            "Upload URL must use http or https, found '{}'",
            other
        ))),
    }
}
