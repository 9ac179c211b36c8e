use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;

/// Every Flutter project root carries this manifest.
pub const PROJECT_MARKER: &str = "pubspec.yaml";

/// A Flutter project root, i.e. a directory holding `pubspec.yaml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Returns the project rooted at `dir`, if `dir` is one. Parent
    /// directories are not searched.
    #[must_use]
    pub fn detect(dir: &Path) -> Option<Self> {
        dir.join(PROJECT_MARKER).is_file().then(|| Self {
            root: dir.to_path_buf(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn pin_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }
}
