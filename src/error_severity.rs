//! 終了コードの分類
//!
//! 各層のエラー型は `severity()` でこの分類を返し、`main` が終了コードと
//! `--machine` 出力の `kind` を決める。このモジュールは他のモジュールに依存しない。

use std::fmt;

/// アップロードが失敗した理由の大分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// 呼び出し方の誤り（ファイルがない、オプション値が不正、URL の形式が違う）
    ///
    /// **Exit Code: 1**
    UserError,

    /// 認証情報や既定URLが未設定、または config.toml が壊れている
    ///
    /// **Exit Code: 2**
    ConfigError,

    /// 転送中の失敗（ネットワーク、サーバーの 4xx/5xx、ローカル I/O）
    ///
    /// サーバー側のセッションはクリーンアップ済み。同じコマンドで最初からやり直せる。
    ///
    /// **Exit Code: 3**
    SystemError,

    /// Ctrl-C などで利用者が中断した
    ///
    /// シェルの慣例（128 + SIGINT）に合わせる。
    ///
    /// **Exit Code: 130**
    Interrupted,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::UserError => 1,
            Self::ConfigError => 2,
            Self::SystemError => 3,
            Self::Interrupted => 130,
        }
    }

    /// 機械可読出力の `kind` フィールド
    pub fn kind(self) -> &'static str {
        match self {
            Self::UserError => "usage",
            Self::ConfigError => "config",
            Self::SystemError => "transfer",
            Self::Interrupted => "interrupted",
        }
    }

    /// 同じ入力のまま再実行して成功する見込みがあるか
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::SystemError | Self::Interrupted)
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UserError => "invalid usage",
            Self::ConfigError => "configuration problem",
            Self::SystemError => "transfer failed",
            Self::Interrupted => "interrupted",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes: Vec<i32> = [
            ErrorSeverity::UserError,
            ErrorSeverity::ConfigError,
            ErrorSeverity::SystemError,
            ErrorSeverity::Interrupted,
        ]
        .iter()
        .map(|s| s.exit_code())
        .collect();
        assert_eq!(codes, vec![1, 2, 3, 130]);
    }

    #[test]
    fn test_only_transfer_failures_and_interrupts_are_retryable() {
        assert!(ErrorSeverity::SystemError.is_retryable());
        assert!(ErrorSeverity::Interrupted.is_retryable());
        assert!(!ErrorSeverity::UserError.is_retryable());
        assert!(!ErrorSeverity::ConfigError.is_retryable());
        assert_eq!(ErrorSeverity::SystemError.kind(), "transfer");
    }
}
