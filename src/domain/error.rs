/// ドメイン層のエラー定義
///
/// アップロード対象やアップロード設定の制約違反を表現する。
/// 外部クレートのエラーは含まない。
use crate::error_severity::ErrorSeverity;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// ファイルが見つからない
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// ファイルが空
    #[error("file is empty: {path}")]
    EmptyFile { path: String },

    /// ディレクトリが指定された（ファイルが期待される場所）
    #[error("'{path}' is a directory, not a file")]
    NotAFile { path: String },

    /// アップロード設定が不正
    #[error("invalid upload option '{field}': {message}")]
    InvalidOptions { field: String, message: String },
}

impl DomainError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn empty_file(path: impl Into<String>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    pub fn invalid_options(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            field: field.into(),
            message: message.into(),
        }
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::UserError
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::FileNotFound { .. } => {
                Some("Please check the file path and ensure the file exists.")
            }
            Self::EmptyFile { .. } => Some("The file appears to be empty or corrupted."),
            Self::NotAFile { .. } => Some("Please specify a file, not a directory."),
            Self::InvalidOptions { .. } => {
                Some("chunk size and concurrency must be greater than zero.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_domain_errors_are_user_errors() {
        let errors = [
            DomainError::file_not_found("a.pdf"),
            DomainError::empty_file("a.pdf"),
            DomainError::not_a_file("docs"),
            DomainError::invalid_options("chunk_size", "must be greater than 0"),
        ];
        for error in errors {
            assert_eq!(error.severity(), ErrorSeverity::UserError);
            assert!(error.hint().is_some());
        }
    }

    #[test]
    fn test_invalid_options_message() {
        let error = DomainError::invalid_options("max_concurrent", "must be greater than 0");
        assert_eq!(
            error.to_string(),
            "invalid upload option 'max_concurrent': must be greater than 0"
        );
    }
}
