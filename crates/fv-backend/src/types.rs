use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Release track an SDK build was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Beta,
    Master,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Stable, Channel::Beta, Channel::Master];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Beta => "beta",
            Self::Master => "master",
        }
    }

    /// Only `stable` and `beta` have downloadable release archives.
    #[must_use]
    pub fn is_installable(self) -> bool {
        matches!(self, Self::Stable | Self::Beta)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| VersionParseError::UnknownChannel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    Version,
    Channel,
}

impl fmt::Display for VersionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version => write!(f, "version"),
            Self::Channel => write!(f, "channel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("Cannot get Flutter {0} from flutter --version command")]
    Missing(VersionField),
    #[error("Unknown Flutter channel: {0}")]
    UnknownChannel(String),
    #[error("Invalid project pin file {path}: {details}")]
    InvalidPin { path: String, details: String },
}

/// Version and channel as reported by `flutter --version`, plus the
/// directory it was resolved from when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl VersionInfo {
    #[must_use]
    pub fn new(version: impl Into<String>, channel: Channel) -> Self {
        Self {
            version: version.into(),
            channel,
            dir: None,
        }
    }

    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<String>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Two builds are the same release when version and channel agree; the
    /// directory they live in does not matter.
    #[must_use]
    pub fn same_release(&self, version: &str, channel: Channel) -> bool {
        self.version == version && self.channel == channel
    }
}

/// Contents of a project's `.flutter-version.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPin {
    pub version: String,
    pub channel: Channel,
    pub dir: String,
}

impl ProjectPin {
    #[must_use]
    pub fn matches(&self, info: &VersionInfo) -> bool {
        info.same_release(&self.version, self.channel)
    }
}

impl From<ProjectPin> for VersionInfo {
    fn from(pin: ProjectPin) -> Self {
        VersionInfo::new(pin.version, pin.channel).with_dir(pin.dir)
    }
}

/// What the suffix of a `flutter-<tag>` directory claims to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Channel(Channel),
    Version(String),
}

/// One row of the installed-versions listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledEntry {
    pub directory: String,
    pub tag: String,
    pub resolved: VersionInfo,
    pub is_active: bool,
    pub is_project_pinned: bool,
    pub mismatch: Option<String>,
}
