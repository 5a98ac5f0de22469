/// アプリケーション設定モジュール
///
/// ビルド時に config.toml から読み込まれる静的設定を管理します。
/// これらの設定は実行時には変更できません。
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// 1 MiB のバイト数
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// グローバルなアプリケーション設定
///
/// 初回アクセス時に埋め込みの config.toml をパースします。
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(AppConfig::load);

/// アプリケーション全体の設定
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// API関連の設定
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// HTTPリクエストのタイムアウト(秒)
    pub timeout_seconds: u64,
}

/// アップロード関連の設定（UploadOptions のデフォルト値）
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// 1チャンクあたりのバイト数
    pub chunk_size: u64,

    /// 1バッチで同時にアップロードするチャンク数
    pub max_concurrent: usize,

    /// チャンクごとの最大試行回数
    pub retry_attempts: u32,

    /// リトライ待機の基準時間(ミリ秒)
    pub retry_delay_ms: u64,

    /// このサイズを超えるファイルはチャンク分割してアップロードする
    pub chunk_threshold: u64,
}

impl UploadConfig {
    /// リトライ待機の基準時間
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// ロギング関連の設定
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// RUST_LOG 未設定時のログレベル (trace, debug, info, warn, error)
    pub level: String,
}

impl AppConfig {
    /// ビルド時に埋め込まれたconfig.tomlから設定を読み込む
    ///
    /// # Panics
    /// 設定ファイルのパースに失敗した場合はパニックします。
    /// これはビルド時設定なので、実行時エラーではなくコンパイルエラーとして扱うべきです。
    pub fn load() -> Self {
        const CONFIG_STR: &str = include_str!("../../config.toml");
        toml::from_str(CONFIG_STR)
            .expect("Failed to parse embedded config.toml. This is a build-time configuration error.")
    }
}
