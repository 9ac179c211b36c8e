use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadProgress {
    Downloading { downloaded: u64, total: u64 },
    Finished { downloaded: u64 },
}

impl DownloadProgress {
    /// Whole-number percentage, or `None` when the server sent no length.
    #[must_use]
    pub fn percent(&self) -> Option<u64> {
        match *self {
            Self::Downloading { total: 0, .. } => None,
            Self::Downloading { downloaded, total } => {
                Some((downloaded.saturating_mul(100) / total).min(100))
            }
            Self::Finished { .. } => Some(100),
        }
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download of {url} failed with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot derive a file name from {0}")]
    InvalidUrl(String),
}

impl DownloadError {
    fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<DownloadError> for fv_backend::SdkError {
    fn from(error: DownloadError) -> Self {
        fv_backend::SdkError::transport_from("download", error)
    }
}

/// Fetches a URL into a directory, reporting progress as bytes arrive.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` into `dest_dir`, named after the last URL segment.
    /// Returns the path of the written file.
    async fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: &mpsc::Sender<DownloadProgress>,
    ) -> Result<PathBuf, DownloadError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        progress: &mpsc::Sender<DownloadProgress>,
    ) -> Result<PathBuf, DownloadError> {
        use futures_util::StreamExt;

        let file_name = file_name_from_url(url)?;
        let dest = dest_dir.join(file_name);

        info!("Downloading {url} to {}", dest.display());
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let total = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;
        debug!("Content length: {total} bytes");

        let mut file = tokio::fs::File::create(&dest)
            .await
            .map_err(|error| DownloadError::io("failed to create", &dest, error))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| DownloadError::Request {
                url: url.to_string(),
                source,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|error| DownloadError::io("failed to write", &dest, error))?;
            downloaded += chunk.len() as u64;
            let _ = progress
                .send(DownloadProgress::Downloading { downloaded, total })
                .await;
        }

        file.flush()
            .await
            .map_err(|error| DownloadError::io("failed to flush", &dest, error))?;
        let _ = progress.send(DownloadProgress::Finished { downloaded }).await;

        info!("Download complete: {downloaded} bytes");
        Ok(dest)
    }
}

fn file_name_from_url(url: &str) -> Result<&str, DownloadError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .filter(|_| path.contains('/'))
        .ok_or_else(|| DownloadError::InvalidUrl(url.to_string()))
}
