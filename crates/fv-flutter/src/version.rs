use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use fv_backend::{Channel, TagKind, VersionField, VersionInfo, VersionParseError};

/// Installed SDK directories are named `flutter-<tag>`.
pub const DIR_PREFIX: &str = "flutter-";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Flutter\s([\d.\-\w]+)\s").expect("valid version regex"));
static CHANNEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\schannel\s(stable|beta|master)\s").expect("valid channel regex")
});

/// Extract version and channel from `flutter --version` output, e.g.
///
/// ```text
/// Flutter 3.16.2 • channel stable • https://github.com/flutter/flutter.git
/// ```
///
/// # Errors
/// Returns [`VersionParseError::Missing`] naming the first piece that could
/// not be found.
pub fn parse_version_banner(output: &str) -> Result<VersionInfo, VersionParseError> {
    let version = VERSION_RE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
        .ok_or(VersionParseError::Missing(VersionField::Version))?;

    let channel: Channel = CHANNEL_RE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or(VersionParseError::Missing(VersionField::Channel))?
        .parse()?;

    Ok(VersionInfo::new(version, channel))
}

/// A tag is a channel only when it is exactly one of the channel names.
#[must_use]
pub fn classify_tag(tag: &str) -> TagKind {
    tag.parse::<Channel>()
        .map_or_else(|_| TagKind::Version(tag.to_string()), TagKind::Channel)
}

/// True for fixed releases like `flutter-3.16.2`, false for rolling channel
/// checkouts like `flutter-stable` that can be upgraded in place.
///
/// Accepts a bare directory name or a full path; only the last segment is
/// inspected.
#[must_use]
pub fn is_versioned_directory_name(name: &Path) -> bool {
    let Some(segment) = name.file_name().and_then(|s| s.to_str()) else {
        return false;
    };
    segment.strip_prefix(DIR_PREFIX).is_some_and(|suffix| {
        suffix.contains('.') && suffix.chars().any(|c| c.is_ascii_digit())
    })
}

/// Directory name for an installed tag.
#[must_use]
pub fn dir_name_for_tag(tag: &str) -> String {
    format!("{DIR_PREFIX}{tag}")
}

/// The tag part of an installed directory name, if it follows the naming
/// convention. Everything after the first dash is the tag.
#[must_use]
pub fn tag_of_dir_name(name: &str) -> Option<&str> {
    name.strip_prefix(DIR_PREFIX)
}
