use std::path::{Path, PathBuf};

use log::info;

use fv_backend::SdkError;

use crate::version::dir_name_for_tag;

/// Delete `<versions_dir>/flutter-<tag>` and everything in it.
///
/// The active symlink is not consulted, so removing the active release
/// leaves a dangling symlink behind.
///
/// # Errors
/// Returns [`SdkError::NotFound`] when the directory does not exist.
pub async fn uninstall(tag: &str, versions_dir: &Path) -> Result<PathBuf, SdkError> {
    let target = versions_dir.join(dir_name_for_tag(tag));
    if !target.exists() {
        return Err(SdkError::not_found(format!(
            "File {} does not exist.",
            target.display()
        )));
    }

    let is_dir = tokio::fs::symlink_metadata(&target)
        .await
        .map_err(|err| SdkError::io_with_path(&target, &err))?
        .is_dir();
    let removed = if is_dir {
        tokio::fs::remove_dir_all(&target).await
    } else {
        tokio::fs::remove_file(&target).await
    };
    removed.map_err(|err| SdkError::io_with_path(&target, &err))?;
    info!("Removed {}", target.display());
    Ok(target)
}
