use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};
use thiserror::Error;

use fv_platform::tool_command;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unzip exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("{context}: {source}")]
    Zip {
        context: &'static str,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<ExtractError> for fv_backend::SdkError {
    fn from(error: ExtractError) -> Self {
        fv_backend::SdkError::transport_from("extraction", error)
    }
}

/// Extract a zip archive into `dest`, overwriting existing files.
///
/// Uses the system `unzip` when it is on `PATH`, otherwise the in-process
/// extractor. Both restore the symlinks SDK archives contain.
///
/// # Errors
/// Returns an error when the archive cannot be read or written out.
pub async fn extract_archive(archive: &Path, dest: &Path) -> Result<(), ExtractError> {
    std::fs::create_dir_all(dest)
        .map_err(|error| ExtractError::io("failed to create", dest, error))?;

    match which::which("unzip") {
        Ok(unzip) => unzip_with(&unzip, archive, dest).await,
        Err(error) => {
            warn!("unzip not found ({error}), using built-in extractor");
            extract_zip(archive, dest)
        }
    }
}

async fn unzip_with(unzip: &Path, archive: &Path, dest: &Path) -> Result<(), ExtractError> {
    let archive_arg = archive.to_string_lossy();
    let dest_arg = dest.to_string_lossy();
    info!("Extracting {archive_arg} to {dest_arg}");

    let output = tool_command(unzip, &["-o", &archive_arg, "-d", &dest_arg])
        .output()
        .await
        .map_err(|source| ExtractError::Spawn {
            program: unzip.to_path_buf(),
            source,
        })?;

    trace!("unzip stdout: {}", String::from_utf8_lossy(&output.stdout));

    if output.status.success() {
        debug!("Extraction complete to {}", dest.display());
        Ok(())
    } else {
        Err(ExtractError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

fn extract_zip(zip_path: &Path, dest: &Path) -> Result<(), ExtractError> {
    let file = std::fs::File::open(zip_path)
        .map_err(|error| ExtractError::io("failed to open", zip_path, error))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|source| ExtractError::Zip {
        context: "failed to read zip archive",
        source,
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|source| ExtractError::Zip {
            context: "failed to read zip entry",
            source,
        })?;
        let Some(name) = entry.enclosed_name() else {
            warn!("Skipping zip entry with unsafe path");
            continue;
        };
        let out_path = dest.join(&name);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)
                .map_err(|error| ExtractError::io("failed to create", &out_path, error))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| ExtractError::io("failed to create", parent, error))?;
        }

        if entry.is_symlink() {
            let mut target = String::new();
            std::io::Read::read_to_string(&mut entry, &mut target)
                .map_err(|error| ExtractError::io("failed to extract", &out_path, error))?;
            if !link_stays_inside(&name, Path::new(&target)) {
                warn!("Skipping symlink {} escaping the archive", name.display());
                continue;
            }
            restore_symlink(Path::new(&target), &out_path)?;
            continue;
        }

        let mut outfile = std::fs::File::create(&out_path)
            .map_err(|error| ExtractError::io("failed to create", &out_path, error))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|error| ExtractError::io("failed to extract", &out_path, error))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                let _ = std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode));
            }
        }
    }

    debug!("Extraction complete to {}", dest.display());
    Ok(())
}

/// Whether a link stored at archive path `entry` pointing at `target`
/// resolves to somewhere inside the archive root.
fn link_stays_inside(entry: &Path, target: &Path) -> bool {
    use std::path::Component;

    let mut depth = entry.components().count().saturating_sub(1);
    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(parent) => depth = parent,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

fn restore_symlink(target: &Path, link: &Path) -> Result<(), ExtractError> {
    match std::fs::symlink_metadata(link) {
        Ok(metadata) if metadata.is_dir() => std::fs::remove_dir_all(link),
        Ok(_) => std::fs::remove_file(link),
        Err(_) => Ok(()),
    }
    .map_err(|error| ExtractError::io("failed to replace", link, error))?;

    #[cfg(unix)]
    let created = std::os::unix::fs::symlink(target, link);
    #[cfg(windows)]
    let created = if link
        .parent()
        .is_some_and(|parent| parent.join(target).is_dir())
    {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    };

    created.map_err(|error| ExtractError::io("failed to create symlink", link, error))
}
