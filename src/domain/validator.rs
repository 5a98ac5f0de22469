/// ドメインサービス: ファイルバリデーション
///
/// アップロード対象のファイルを検証し、送信に必要なメタデータ
/// （ファイル名、サイズ、MIMEタイプ）を取り出す。
use crate::domain::error::DomainError;
use std::path::Path;

/// 不明な拡張子に使うMIMEタイプ
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// ファイルのバリデーション結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub path: String,
    pub file_name: String,
    pub size: u64,
    pub mime_type: String,
}

/// アップロード対象のファイルをバリデーションする
///
/// # エラー
/// - ファイルが存在しない
/// - ディレクトリが指定された
/// - ファイルが空
pub fn validate_upload_file(file_path: &str) -> Result<ValidationResult, DomainError> {
    let path = Path::new(file_path);

    let metadata = std::fs::metadata(path).map_err(|_| DomainError::file_not_found(file_path))?;

    if metadata.is_dir() {
        return Err(DomainError::not_a_file(file_path));
    }

    let size = metadata.len();
    if size == 0 {
        return Err(DomainError::empty_file(file_path));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());

    Ok(ValidationResult {
        path: file_path.to_string(),
        mime_type: guess_mime_type(&file_name).to_string(),
        file_name,
        size,
    })
}

/// 拡張子からMIMEタイプを推定する
///
/// ポータルで扱うコンテンツ（書籍、記事の画像、動画、資料）の形式のみ対応。
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("epub") => "application/epub+zip",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("zip") => "application/zip",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => DEFAULT_MIME_TYPE,
    }
}
