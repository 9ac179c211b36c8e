//! Transport glue for flutter-version.
//!
//! This crate holds the I/O pieces that have no knowledge of installed SDKs:
//! - Streaming HTTP downloads with progress reporting.
//! - Zip extraction through the system `unzip` or a built-in fallback.
//! - Release archive naming and the storage host to fetch from.

mod download;
mod extract;
mod release;

/// Download trait, the HTTP implementation and its progress events.
pub use download::{DownloadError, DownloadProgress, Downloader, HttpDownloader};
/// Archive extraction entry point.
pub use extract::{ExtractError, extract_archive};
/// Release archive URL construction.
pub use release::{
    ARCHIVE_ROOT_DIR, DEFAULT_STORAGE_BASE_URL, ReleaseArchive, STORAGE_BASE_URL_ENV,
    storage_base_url,
};
