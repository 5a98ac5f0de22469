/// インフラ層のエラー定義
///
/// 外部システム（ファイルシステム、ネットワーク、アップロードサーバー）との
/// やり取りで発生するエラーを構造化して定義。
/// #[from] / #[source] を使って原因連鎖を保持する。
use crate::error_severity::ErrorSeverity;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    /// ネットワークエラー
    #[error("network error: {message}")]
    Network { message: String },

    /// 非2xxレスポンス
    #[error("API error: {endpoint} - {message}")]
    Api {
        endpoint: String,
        message: String,
        status_code: Option<u16>,
    },

    /// タイムアウトエラー
    #[error("operation timed out: {operation}")]
    Timeout { operation: String },

    /// ファイル読み込みなどのI/Oエラー
    #[error("I/O error")]
    Io(#[from] io::Error),
}

impl InfraError {
    /// ネットワークエラーを作成
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// APIエラーを作成
    pub fn api(endpoint: impl Into<String>, message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            message: message.into(),
            status_code,
        }
    }

    /// タイムアウトエラーを作成
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// HTTPステータスコード（APIエラーの場合のみ）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::SystemError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_status() {
        let error = InfraError::api("/uploads/init", "Internal Server Error", Some(500));
        assert_eq!(error.status_code(), Some(500));
        assert_eq!(
            error.to_string(),
            "API error: /uploads/init - Internal Server Error"
        );
    }

    #[test]
    fn test_non_api_errors_have_no_status() {
        assert_eq!(InfraError::network("reset").status_code(), None);
        assert_eq!(InfraError::timeout("POST /chunk").status_code(), None);
        assert_eq!(
            InfraError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof")).severity(),
            ErrorSeverity::SystemError
        );
    }
}
