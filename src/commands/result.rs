/// コマンド実行結果を表す型
///
/// 各コマンドはこの型を返し、プレゼンテーション層（presentation::output）で
/// 人間向けと機械向けの出力フォーマットを決定する。
use crate::domain::progress::UploadMode;
use serde::Serialize;

/// コマンド実行結果の統一型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Login(LoginResult),
    Logout(LogoutResult),
    Upload(UploadResult),
    Status(StatusResult),
}

/// ログインコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// 既にログイン済みだったか（上書き更新の場合true）
    pub was_logged_in: bool,
    /// 認証方式（bearer / basic）
    pub scheme: String,
    /// 保存した既定のアップロードURL
    pub upload_url: Option<String>,
}

/// ログアウトコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResult {
    /// ログイン状態だったか
    pub was_logged_in: bool,
}

/// ステータスコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    /// 認証情報が保存されているか
    pub is_authenticated: bool,
    pub scheme: Option<String>,
    /// マスキングされた認証情報
    pub identity: Option<String>,
    pub upload_url: Option<String>,
    pub config_path: String,
}

/// アップロードコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub file_path: String,
    pub file_name: String,
    /// ファイルサイズ（bytes）
    pub file_size: u64,
    pub mime_type: String,
    pub mode: UploadMode,
    /// チャンク数（単発アップロードでは 1）
    pub total_chunks: u64,
    /// サーバーの最終レスポンス
    pub response: serde_json::Value,
}

impl CommandResult {
    /// 成功メッセージを取得（人間向け出力用）
    pub fn success_message(&self) -> String {
        match self {
            CommandResult::Login(r) => {
                if r.was_logged_in {
                    "Login credentials updated!".to_string()
                } else {
                    "Login successful!".to_string()
                }
            }
            CommandResult::Logout(r) => {
                if r.was_logged_in {
                    "Logged out successfully.".to_string()
                } else {
                    "Already logged out.".to_string()
                }
            }
            CommandResult::Upload(_) => "Upload completed successfully!".to_string(),
            CommandResult::Status(r) => {
                if r.is_authenticated {
                    "Authenticated".to_string()
                } else {
                    "Not authenticated".to_string()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_tag() {
        let result = CommandResult::Logout(LogoutResult {
            was_logged_in: true,
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["command"], "logout");
        assert_eq!(json["was_logged_in"], true);
    }

    #[test]
    fn test_success_message() {
        let login = CommandResult::Login(LoginResult {
            was_logged_in: true,
            scheme: "bearer".to_string(),
            upload_url: None,
        });
        assert_eq!(login.success_message(), "Login credentials updated!");

        let logout = CommandResult::Logout(LogoutResult {
            was_logged_in: false,
        });
        assert_eq!(logout.success_message(), "Already logged out.");
    }
}
