//! アップロード元のバイト列
//!
//! ファイル全体をメモリに載せず、任意の `[start, end)` 範囲を読み出せるソース。

use crate::domain::error::DomainError;
use crate::domain::validator::{self, guess_mime_type};
use bytes::Bytes;
use std::future::Future;
use std::io::{self, SeekFrom};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// 範囲読み出しができるアップロード元
pub trait UploadSource: Sync {
    /// 送信時のファイル名
    fn name(&self) -> &str;

    /// 総バイト数
    fn size(&self) -> u64;

    fn mime_type(&self) -> &str;

    /// `[start, end)` のバイト列を読み出す
    fn read_range(&self, start: u64, end: u64) -> impl Future<Output = io::Result<Bytes>> + Send;
}

/// ディスク上のファイル
///
/// 読み出しのたびにファイルを開き直すため、同時に複数の範囲を読める。
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
    size: u64,
    mime_type: String,
}

impl FileSource {
    /// ファイルを検証してソースを作成
    pub fn open(file_path: &str) -> Result<Self, DomainError> {
        let validated = validator::validate_upload_file(file_path)?;
        Ok(Self {
            path: PathBuf::from(validated.path),
            name: validated.file_name,
            size: validated.size,
            mime_type: validated.mime_type,
        })
    }
}

impl UploadSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_range(&self, start: u64, end: u64) -> io::Result<Bytes> {
        let end = end.min(self.size);
        if start >= end {
            return Ok(Bytes::new());
        }

        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(start)).await?;

        let mut buf = vec![0u8; (end - start) as usize];
        file.read_exact(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

/// メモリ上のバイト列
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    mime_type: String,
    data: Bytes,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        Self {
            mime_type: guess_mime_type(&name).to_string(),
            name,
            data: data.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

impl UploadSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read_range(&self, start: u64, end: u64) -> io::Result<Bytes> {
        let end = end.min(self.size());
        if start >= end {
            return Ok(Bytes::new());
        }
        Ok(self.data.slice(start as usize..end as usize))
    }
}
