use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use fv_backend::SdkError;

/// File name shared by the home-level config and the per-project pin.
pub const CONFIG_FILE_NAME: &str = ".flutter-version.json";

const DEFAULT_VERSIONS_DIR: &str = "flutter-versions";
const DEFAULT_SYMLINK: &str = "flutter";

/// Where installed SDKs live and which path points at the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    pub versions_dir: PathBuf,
    pub symlink: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    #[serde(default, rename = "flutterVersionsDir", alias = "versionsDir")]
    versions_dir: Option<String>,
    #[serde(default, rename = "flutterSymlink", alias = "symlink")]
    symlink: Option<String>,
}

impl SystemConfig {
    #[must_use]
    pub fn defaults(home: &Path) -> Self {
        Self {
            versions_dir: home.join(DEFAULT_VERSIONS_DIR),
            symlink: home.join(DEFAULT_SYMLINK),
        }
    }

    /// Resolve the configured paths for `home`, applying
    /// `~/.flutter-version.json` when present.
    ///
    /// # Errors
    /// Returns [`SdkError::Config`] when the override file exists but cannot
    /// be read or is not a JSON object of string paths.
    pub fn resolve(home: &Path) -> Result<Self, SdkError> {
        let mut config = Self::defaults(home);
        let override_file = home.join(CONFIG_FILE_NAME);

        if !override_file.exists() {
            debug!("No config override at {}", override_file.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&override_file).map_err(|error| {
            SdkError::config(format!(
                "Cannot read {}: {error}",
                override_file.display()
            ))
        })?;
        let overrides: ConfigOverrides = serde_json::from_str(&contents).map_err(|error| {
            SdkError::config(format!(
                "Invalid config file {}: {error}",
                override_file.display()
            ))
        })?;

        if let Some(dir) = non_empty(overrides.versions_dir) {
            config.versions_dir = expand_home(&dir, home);
        }
        if let Some(link) = non_empty(overrides.symlink) {
            config.symlink = expand_home(&link, home);
        }

        debug!(
            "Resolved config: versions_dir={}, symlink={}",
            config.versions_dir.display(),
            config.symlink.display()
        );
        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// Only the first `~` is substituted.
fn expand_home(value: &str, home: &Path) -> PathBuf {
    PathBuf::from(value.replacen('~', &home.to_string_lossy(), 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fv_backend::ErrorKind;

    #[test]
    fn defaults_without_override_file() {
        let home = tempfile::tempdir().expect("create temp home");

        let config = SystemConfig::resolve(home.path()).expect("resolve defaults");

        assert_eq!(config.versions_dir, home.path().join("flutter-versions"));
        assert_eq!(config.symlink, home.path().join("flutter"));
    }

    #[test]
    fn override_file_replaces_both_paths_and_expands_tilde() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(
            home.path().join(CONFIG_FILE_NAME),
            r#"{"flutterVersionsDir": "~/sdks", "flutterSymlink": "/opt/flutter"}"#,
        )
        .expect("write override");

        let config = SystemConfig::resolve(home.path()).expect("resolve overrides");

        assert_eq!(
            config.versions_dir,
            PathBuf::from(format!("{}/sdks", home.path().display()))
        );
        assert_eq!(config.symlink, PathBuf::from("/opt/flutter"));
    }

    #[test]
    fn short_key_aliases_are_accepted() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(
            home.path().join(CONFIG_FILE_NAME),
            r#"{"versionsDir": "/data/flutter-versions"}"#,
        )
        .expect("write override");

        let config = SystemConfig::resolve(home.path()).expect("resolve overrides");

        assert_eq!(config.versions_dir, PathBuf::from("/data/flutter-versions"));
        assert_eq!(config.symlink, home.path().join("flutter"));
    }

    #[test]
    fn empty_values_keep_defaults() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(
            home.path().join(CONFIG_FILE_NAME),
            r#"{"flutterVersionsDir": "", "unrelated": 1}"#,
        )
        .expect("write override");

        let config = SystemConfig::resolve(home.path()).expect("resolve overrides");

        assert_eq!(config, SystemConfig::defaults(home.path()));
    }

    #[test]
    fn only_first_tilde_is_expanded() {
        let home = Path::new("/home/dev");

        assert_eq!(
            expand_home("~/a~b", home),
            PathBuf::from("/home/dev/a~b")
        );
    }

    #[test]
    fn malformed_override_is_a_config_error_with_parser_message() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(home.path().join(CONFIG_FILE_NAME), "{ not json").expect("write override");

        let error = SystemConfig::resolve(home.path()).expect_err("malformed config must fail");

        assert_eq!(error.kind(), ErrorKind::Config);
        let message = error.to_string();
        assert!(message.contains(CONFIG_FILE_NAME));
        assert!(message.contains("line 1"), "missing serde detail: {message}");
    }

    #[test]
    fn non_string_path_is_rejected() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(
            home.path().join(CONFIG_FILE_NAME),
            r#"{"flutterSymlink": 42}"#,
        )
        .expect("write override");

        let error = SystemConfig::resolve(home.path()).expect_err("wrong type must fail");

        assert_eq!(error.kind(), ErrorKind::Config);
    }
}
