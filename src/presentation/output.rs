/// プレゼンテーション層: コマンド結果の出力
///
/// コマンド実行結果をユーザー向け（人間可読）または
/// 機械向け（JSON）形式で出力する責務を担います。
use crate::commands::result::CommandResult;
use crate::domain::progress::UploadMode;
use anyhow::Result;

/// コマンド結果を適切な形式で出力する
///
/// * `machine_output = false`: 人間向けの詳細メッセージ（stderr）
/// * `machine_output = true`: 機械可読JSON（stdout）
pub fn output_result(result: &CommandResult, machine_output: bool) -> Result<()> {
    if machine_output {
        println!("{}", serde_json::to_string(&machine_readable(result))?);
    } else {
        output_human_readable(result);
    }
    Ok(())
}

/// 人間向けの詳細メッセージを出力（stderr）
///
/// stdoutはパイプライン用に予約し、アップロードのレスポンスのみを出力します。
fn output_human_readable(result: &CommandResult) {
    match result {
        CommandResult::Login(r) => {
            eprintln!();
            eprintln!("{}", result.success_message());
            eprintln!("Credentials ({}) have been saved.", r.scheme);
            if let Some(url) = &r.upload_url {
                eprintln!("Default upload URL: {}", url);
            }
        }
        CommandResult::Logout(r) => {
            eprintln!("{}", result.success_message());
            if r.was_logged_in {
                eprintln!("Authentication credentials have been removed.");
            }
        }
        CommandResult::Status(r) => {
            if r.is_authenticated {
                eprintln!("Authenticated");
                if let (Some(scheme), Some(identity)) = (&r.scheme, &r.identity) {
                    eprintln!("  Credentials: {} ({})", identity, scheme);
                }
            } else {
                eprintln!("Not logged in");
                eprintln!("  No authentication credentials found.");
                eprintln!("  Run 'chunkup login' if the upload server requires them.");
            }
            match &r.upload_url {
                Some(url) => eprintln!("  Upload URL: {}", url),
                None => eprintln!("  Upload URL: (not set)"),
            }
            eprintln!("  Config: {}", r.config_path);
        }
        CommandResult::Upload(r) => {
            eprintln!();
            eprintln!("{}", result.success_message());
            eprintln!("---");
            eprintln!("File: {} ({} bytes, {})", r.file_name, r.file_size, r.mime_type);
            match r.mode {
                UploadMode::Chunked => eprintln!("Mode: chunked ({} chunks)", r.total_chunks),
                UploadMode::Simple => eprintln!("Mode: single request"),
            }
            eprintln!("---");
            if !r.response.is_null() {
                println!("{}", r.response);
            }
        }
    }
}

/// 機械可読JSON
///
/// `CommandResult` のシリアライズ結果に `success: true` を付与します。
fn machine_readable(result: &CommandResult) -> serde_json::Value {
    let mut json = serde_json::to_value(result).unwrap_or_else(|_| serde_json::json!({}));
    if let Some(object) = json.as_object_mut() {
        object.insert("success".to_string(), serde_json::Value::Bool(true));
    }
    json
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::result::{LoginResult, StatusResult, UploadResult};

    #[test]
    fn test_machine_readable_login() {
        let result = CommandResult::Login(LoginResult {
            was_logged_in: false,
            scheme: "bearer".to_string(),
            upload_url: None,
        });

        let json = machine_readable(&result);
        assert_eq!(json["success"], true);
        assert_eq!(json["command"], "login");
        assert_eq!(json["scheme"], "bearer");
    }

    #[test]
    fn test_machine_readable_upload() {
        let result = CommandResult::Upload(UploadResult {
            file_path: "/tmp/video.mp4".to_string(),
            file_name: "video.mp4".to_string(),
            file_size: 12 * 1024 * 1024,
            mime_type: "video/mp4".to_string(),
            mode: UploadMode::Chunked,
            total_chunks: 12,
            response: serde_json::json!({ "fileUrl": "https://cdn.example.com/v" }),
        });

        let json = machine_readable(&result);
        assert_eq!(json["command"], "upload");
        assert_eq!(json["mode"], "chunked");
        assert_eq!(json["total_chunks"], 12);
        assert_eq!(json["response"]["fileUrl"], "https://cdn.example.com/v");
    }

    #[test]
    fn test_output_result_both_modes() {
        let result = CommandResult::Status(StatusResult {
            is_authenticated: false,
            scheme: None,
            identity: None,
            upload_url: None,
            config_path: "/tmp/chunkup/config.toml".to_string(),
        });

        assert!(output_result(&result, true).is_ok());
        assert!(output_result(&result, false).is_ok());
    }
}
