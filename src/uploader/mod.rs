//! アップロード処理
//!
//! - `chunked`: init → chunk × N → complete のセッション型アップロード
//! - `simple`: 単一の multipart POST
//! - `smart`: ファイルサイズによる方式の切り替え

pub mod chunked;
pub mod error;
pub mod options;
pub mod simple;
pub mod smart;
pub mod source;

#[cfg(test)]
mod mock;

pub use chunked::upload_in_chunks;
pub use error::{CleanupError, UploadError, UploadStage};
pub use options::{AbortHandle, UploadOptions};
pub use simple::upload_with_progress;
pub use smart::{select_mode, smart_upload};
pub use source::{FileSource, MemorySource, UploadSource};
