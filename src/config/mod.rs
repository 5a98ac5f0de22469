/// 設定管理モジュール
///
/// このモジュールは2層の設定構造を提供します:
/// 1. AppConfig - ビルド時に config.toml から埋め込まれる静的設定（APP_CONFIG）
/// 2. UserConfig - 実行時に読み込まれる動的設定（認証情報、既定URL、上書き値）
///
/// # 使用例
///
/// ```no_run
/// use chunkup::config::{APP_CONFIG, UserConfig};
///
/// // AppConfig: グローバル定数として直接参照
/// let chunk_size = APP_CONFIG.upload.chunk_size;
///
/// // UserConfig: load時に自動検証
/// let user_config = UserConfig::load()?;
/// let auth = user_config.get_auth()?;
/// # Ok::<(), chunkup::config::error::ConfigError>(())
/// ```
pub mod app;
pub mod error;
pub mod permissions;
pub mod user;

pub use app::{APP_CONFIG, BYTES_PER_MB};
pub use user::{AuthConfig, UploadOverrides, UserConfig};
