use std::io;
use std::path::{Path, PathBuf};

use log::debug;

/// True if `path` itself is a symbolic link (dangling links included).
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}

/// True if anything at all occupies `path`, without following links.
#[must_use]
pub fn occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Read where `link` points. Relative targets are resolved against the
/// link's parent directory.
///
/// # Errors
/// Returns the underlying error when `link` is missing or not a symlink.
pub fn read_target(link: &Path) -> io::Result<PathBuf> {
    let target = std::fs::read_link(link)?;
    if target.is_absolute() {
        return Ok(target);
    }
    let base = link.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(target))
}

/// Last path segment of `path` as an owned string.
#[must_use]
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Remove `link` if it is a symlink. Returns whether anything was removed.
///
/// # Errors
/// Returns an error if the link exists but cannot be removed.
pub fn remove_if_symlink(link: &Path) -> io::Result<bool> {
    if !is_symlink(link) {
        return Ok(false);
    }
    debug!("Unlinking {}", link.display());
    remove_link(link)?;
    Ok(true)
}

/// Create a directory symlink at `link` pointing to `target`.
///
/// # Errors
/// Returns an error if the link cannot be created.
pub fn create_dir_link(target: &Path, link: &Path) -> io::Result<()> {
    debug!("Linking {} -> {}", link.display(), target.display());

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_dir(target, link)
    }
}

#[cfg(unix)]
fn remove_link(link: &Path) -> io::Result<()> {
    std::fs::remove_file(link)
}

// Directory symlinks on Windows are removed like directories.
#[cfg(windows)]
fn remove_link(link: &Path) -> io::Result<()> {
    std::fs::remove_dir(link).or_else(|_| std::fs::remove_file(link))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn detects_symlinks_including_dangling() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let target = dir.path().join("flutter-stable");
        let link = dir.path().join("flutter");
        std::fs::create_dir(&target).expect("create target");
        create_dir_link(&target, &link).expect("create link");

        assert!(is_symlink(&link));
        assert!(!is_symlink(&target));

        std::fs::remove_dir(&target).expect("remove target");
        assert!(is_symlink(&link));
        assert!(occupied(&link));
        assert!(!link.exists());
    }

    #[test]
    fn read_target_resolves_relative_links() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(dir.path().join("flutter-beta")).expect("create target");
        let link = dir.path().join("flutter");
        std::os::unix::fs::symlink("flutter-beta", &link).expect("create relative link");

        let target = read_target(&link).expect("read target");

        assert_eq!(target, dir.path().join("flutter-beta"));
        assert_eq!(dir_name(&target), "flutter-beta");
    }

    #[test]
    fn read_target_fails_for_regular_directory() {
        let dir = tempfile::tempdir().expect("create temp dir");

        assert!(read_target(dir.path()).is_err());
    }

    #[test]
    fn remove_if_symlink_leaves_real_directories_alone() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let real = dir.path().join("flutter");
        std::fs::create_dir(&real).expect("create dir");

        let removed = remove_if_symlink(&real).expect("no error for real dir");

        assert!(!removed);
        assert!(real.is_dir());
    }

    #[test]
    fn remove_if_symlink_removes_link_but_not_target() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let target = dir.path().join("flutter-3.16.2");
        let link = dir.path().join("flutter");
        std::fs::create_dir(&target).expect("create target");
        create_dir_link(&target, &link).expect("create link");

        let removed = remove_if_symlink(&link).expect("remove link");

        assert!(removed);
        assert!(!occupied(&link));
        assert!(target.is_dir());
    }
}
