//! チャンク分割アップローダー
//!
//! 大きなファイルを `init → chunk × N → complete` のセッションプロトコルで
//! HTTP エンドポイントに送信する。同時送信数の上限、チャンクごとのリトライ、
//! 単調増加する進捗通知、失敗時のクリーンアップを備える。
//!
//! ```no_run
//! use chunkup::api::client::ApiClient;
//! use chunkup::uploader::{FileSource, UploadOptions, smart_upload};
//! use reqwest::header::HeaderMap;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ApiClient::from_config()?;
//! let source = FileSource::open("lecture.mp4")?;
//! let response = smart_upload(
//!     &client,
//!     &source,
//!     "https://example.com/api/uploads",
//!     &UploadOptions::default(),
//!     None,
//!     &HeaderMap::new(),
//! )
//! .await?;
//! println!("{}", response);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error_severity;
pub mod presentation;
pub mod uploader;
