/// チャンクアップロードプロトコルの型定義
///
/// `{uploadUrl}/init`, `/complete`, `/cleanup` に送るJSONボディと、
/// `/init` のレスポンスを表現します。キーはすべて camelCase です。
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// POST `{uploadUrl}/init` のリクエストボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
    pub file_name: String,
    pub file_size: u64,
    pub total_chunks: u64,
    pub upload_id: String,
    pub mime_type: String,
}

/// POST `{uploadUrl}/init` のレスポンス
///
/// `sessionId` は省略可能です。省略時はクライアント生成の uploadId を使います。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

impl InitResponse {
    /// レスポンスボディから読み取る
    ///
    /// JSONオブジェクトでない、または `sessionId` が文字列でない場合は
    /// セッションIDなしとして扱います。
    pub fn from_body(body: serde_json::Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }
}

/// POST `{uploadUrl}/complete` のリクエストボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub session_id: String,
    pub uploaded_chunks: Vec<u64>,
    pub file_name: String,
    pub file_size: u64,
}

/// POST `{uploadUrl}/cleanup` のリクエストボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    pub upload_id: String,
}

/// multipart/form-data で送るファイルパート
#[derive(Debug, Clone)]
pub struct FormFile {
    /// フォームのフィールド名（チャンクは "chunk"、単発アップロードは "file"）
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// multipart/form-data のリクエストボディ
#[derive(Debug, Clone)]
pub struct UploadForm {
    /// テキストフィールド（送信順）
    pub fields: Vec<(String, String)>,
    pub file: FormFile,
}

impl UploadForm {
    pub fn new(file: FormFile) -> Self {
        Self {
            fields: Vec::new(),
            file,
        }
    }

    /// テキストフィールドを追加
    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((name.into(), value.to_string()));
        self
    }

    /// テキストフィールドの値を取得
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_init_request_uses_camel_case() {
        let request = InitRequest {
            file_name: "lecture.mp4".to_string(),
            file_size: 5_242_880,
            total_chunks: 5,
            upload_id: "1700000000000-abc".to_string(),
            mime_type: "video/mp4".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "fileName": "lecture.mp4",
                "fileSize": 5_242_880,
                "totalChunks": 5,
                "uploadId": "1700000000000-abc",
                "mimeType": "video/mp4"
            })
        );
    }

    #[test]
    fn test_init_response_with_session_id() {
        let response = InitResponse::from_body(json!({ "sessionId": "srv-42", "extra": true }));
        assert_eq!(response.session_id.as_deref(), Some("srv-42"));
    }

    #[test]
    fn test_init_response_tolerates_missing_or_odd_bodies() {
        assert_eq!(InitResponse::from_body(json!({})).session_id, None);
        assert_eq!(InitResponse::from_body(serde_json::Value::Null).session_id, None);
        assert_eq!(InitResponse::from_body(json!("ok")).session_id, None);
        assert_eq!(InitResponse::from_body(json!({ "sessionId": 7 })).session_id, None);
    }

    #[test]
    fn test_complete_request_shape() {
        let request = CompleteRequest {
            session_id: "srv-42".to_string(),
            uploaded_chunks: vec![1, 2, 3],
            file_name: "a.pdf".to_string(),
            file_size: 10,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sessionId"], "srv-42");
        assert_eq!(value["uploadedChunks"], json!([1, 2, 3]));
        assert_eq!(value["fileSize"], 10);
    }

    #[test]
    fn test_upload_form_fields() {
        let form = UploadForm::new(FormFile {
            field: "chunk".to_string(),
            file_name: "a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: Bytes::from_static(b"abc"),
        })
        .text("chunkNumber", 2)
        .text("sessionId", "srv-42");

        assert_eq!(form.field("chunkNumber"), Some("2"));
        assert_eq!(form.field("sessionId"), Some("srv-42"));
        assert_eq!(form.field("missing"), None);
    }
}
