use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tokio::sync::mpsc;

use fv_backend::{Channel, SdkError};
use fv_core::{
    ARCHIVE_ROOT_DIR, DownloadProgress, Downloader, ReleaseArchive, extract_archive,
    storage_base_url,
};
use fv_platform::link;

use crate::version::dir_name_for_tag;

/// A validated request to install one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub tag: String,
    pub channel: Channel,
}

impl InstallRequest {
    /// Build a request from command-line text. The channel defaults to
    /// `stable`.
    ///
    /// # Errors
    /// Returns [`SdkError::Usage`] for an unknown channel or one that has no
    /// release archives.
    pub fn parse(tag: &str, channel: Option<&str>) -> Result<Self, SdkError> {
        let invalid = || SdkError::usage("Invalid channel argument.");
        let channel = match channel {
            Some(text) => text.parse::<Channel>().map_err(|_| invalid())?,
            None => Channel::Stable,
        };
        if !channel.is_installable() {
            return Err(invalid());
        }
        Ok(Self {
            tag: tag.to_string(),
            channel,
        })
    }
}

/// Downloads release archives and unpacks them into the versions directory.
#[derive(Debug, Clone)]
pub struct Installer<D> {
    downloader: D,
    scratch_dir: PathBuf,
    base_url: String,
}

impl<D: Downloader> Installer<D> {
    /// Uses the OS temp dir as scratch space and the storage host from the
    /// environment.
    pub fn new(downloader: D) -> Self {
        Self {
            downloader,
            scratch_dir: std::env::temp_dir(),
            base_url: storage_base_url(),
        }
    }

    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Install `request` as `<versions_dir>/flutter-<tag>` and return that
    /// path.
    ///
    /// The archive is unpacked into `<scratch>/flutter`, so two installs
    /// sharing a scratch directory must not run at the same time.
    ///
    /// # Errors
    /// - [`SdkError::Conflict`] when the target directory already exists.
    /// - [`SdkError::Transport`] when downloading or extracting fails.
    /// - [`SdkError::Io`] when moving the extracted SDK into place fails.
    pub async fn install(
        &self,
        request: &InstallRequest,
        versions_dir: &Path,
        progress: &mpsc::Sender<DownloadProgress>,
    ) -> Result<PathBuf, SdkError> {
        tokio::fs::create_dir_all(versions_dir)
            .await
            .map_err(|err| SdkError::io_with_path(versions_dir, &err))?;

        let target = versions_dir.join(dir_name_for_tag(&request.tag));
        if link::occupied(&target) {
            return Err(SdkError::conflict(format!(
                "Directory {} already exists.",
                target.display()
            )));
        }

        let archive = ReleaseArchive::for_host(&request.tag, request.channel);
        let url = archive.url(&self.base_url);
        debug!("Release archive for {}: {url}", request.tag);

        let zip_path = self
            .downloader
            .fetch(&url, &self.scratch_dir, progress)
            .await?;
        extract_archive(&zip_path, &self.scratch_dir).await?;

        let extracted = self.scratch_dir.join(ARCHIVE_ROOT_DIR);
        if !extracted.is_dir() {
            return Err(SdkError::transport(
                "extraction",
                format!(
                    "{} did not contain a {ARCHIVE_ROOT_DIR}/ directory",
                    zip_path.display()
                ),
            ));
        }

        move_dir(&extracted, &target)
            .await
            .map_err(|err| SdkError::io_with_path(&target, &err))?;
        info!("Installed Flutter {} to {}", request.tag, target.display());

        if let Err(err) = tokio::fs::remove_file(&zip_path).await {
            warn!("Failed to remove {}: {err}", zip_path.display());
        }

        Ok(target)
    }
}

/// Rename `from` to `to`, copying and then deleting when they sit on
/// different filesystems (e.g. a tmpfs `/tmp`).
async fn move_dir(from: &Path, to: &Path) -> io::Result<()> {
    match tokio::fs::rename(from, to).await {
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            warn!(
                "Cannot rename {} across filesystems, copying instead",
                from.display()
            );
            let (src, dst) = (from.to_path_buf(), to.to_path_buf());
            tokio::task::spawn_blocking(move || copy_tree(&src, &dst))
                .await
                .map_err(io::Error::other)??;
            tokio::fs::remove_dir_all(from).await
        }
        other => other,
    }
}

/// Copy a directory tree without following symlinks. File modes are kept.
fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let dest = to.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&dest)?;
        } else if file_type.is_symlink() {
            let target = std::fs::read_link(entry.path())?;
            #[cfg(unix)]
            {
                std::os::unix::fs::symlink(&target, &dest)?;
            }
            #[cfg(windows)]
            {
                if entry.path().is_dir() {
                    std::os::windows::fs::symlink_dir(&target, &dest)?;
                } else {
                    std::os::windows::fs::symlink_file(&target, &dest)?;
                }
            }
        } else {
            std::fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
