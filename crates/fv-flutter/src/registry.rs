use log::{debug, info};

use fv_backend::{InstalledEntry, ProjectPin, SdkError, SdkProbe, TagKind, VersionInfo};
use fv_platform::SystemConfig;

use crate::version::{classify_tag, dir_name_for_tag, tag_of_dir_name};

/// List every `flutter-<tag>` directory under the versions directory,
/// annotated with what each installation reports about itself.
///
/// Entries are ordered by plain string comparison of their tags, so
/// `3.10.0` sorts before `3.9.0`.
///
/// # Errors
/// Fails when the versions directory is missing or unreadable, and on the
/// first installation whose `flutter --version` cannot be run or parsed.
pub async fn list_installed<P>(
    config: &SystemConfig,
    project_pin: Option<&ProjectPin>,
    probe: &P,
) -> Result<Vec<InstalledEntry>, SdkError>
where
    P: SdkProbe + ?Sized,
{
    let tags = installed_tags(config)?;
    debug!("Found {} installed directories", tags.len());

    let active = probe.probe(None).await?;
    info!(
        "Active Flutter is {} ({})",
        active.version, active.channel
    );

    let mut entries = Vec::with_capacity(tags.len());
    for tag in tags {
        let directory = dir_name_for_tag(&tag);
        let sdk_dir = config.versions_dir.join(&directory);
        let resolved = probe.probe(Some(sdk_dir.as_path())).await?;

        let is_active = resolved.same_release(&active.version, active.channel);
        let is_project_pinned = project_pin.is_some_and(|pin| pin.matches(&resolved));
        let mismatch = mismatch_note(&tag, &resolved);

        entries.push(InstalledEntry {
            directory,
            tag,
            resolved,
            is_active,
            is_project_pinned,
            mismatch,
        });
    }

    Ok(entries)
}

/// Tags of every installed directory, sorted by byte order.
///
/// # Errors
/// Fails when the versions directory is missing or cannot be read.
pub fn installed_tags(config: &SystemConfig) -> Result<Vec<String>, SdkError> {
    let dir = &config.versions_dir;
    if !dir.is_dir() {
        return Err(SdkError::not_found(format!(
            "Directory {} doesn't exist.",
            dir.display()
        )));
    }

    let mut tags = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|err| SdkError::io_with_path(dir, &err))? {
        let entry = entry.map_err(|err| SdkError::io_with_path(dir, &err))?;
        let name = entry.file_name();
        if let Some(tag) = name.to_str().and_then(tag_of_dir_name) {
            tags.push(tag.to_string());
        }
    }
    tags.sort();
    Ok(tags)
}

/// Describe how a directory's tag disagrees with what the SDK inside it
/// reports, if it does.
#[must_use]
pub fn mismatch_note(tag: &str, resolved: &VersionInfo) -> Option<String> {
    match classify_tag(tag) {
        TagKind::Channel(channel) if channel != resolved.channel => Some(format!(
            "Directory doesn't match channel {}",
            resolved.channel
        )),
        TagKind::Version(version) if version != resolved.version => Some(format!(
            "Directory doesn't match version {}",
            resolved.version
        )),
        _ => None,
    }
}
