use std::fmt;
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};

use fv_backend::{ProjectPin, SdkError, SdkProbe, VersionInfo, VersionParseError};
use fv_platform::{CONFIG_FILE_NAME, Project, SystemConfig, link};

use crate::pin::{read_pin, write_pin};
use crate::version::dir_name_for_tag;

/// How the switch target was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchSelector {
    /// A version or channel given on the command line.
    Tag(String),
    /// The directory recorded in the project's pin file.
    ProjectPin(ProjectPin),
    /// Whatever the symlink points at now; only used to create a pin.
    CurrentActive,
}

/// Result of a successful switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub selector: SwitchSelector,
    pub active: VersionInfo,
    pub pin_written: bool,
}

impl fmt::Display for SwitchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Flutter version {} ({}) activated, path = {}",
            self.active.version,
            self.active.channel,
            self.active.dir.as_deref().unwrap_or_default()
        )?;
        if self.pin_written {
            write!(
                f,
                " - also written into the project {CONFIG_FILE_NAME} file"
            )?;
        }
        Ok(())
    }
}

/// Work out which installation a switch should activate.
///
/// Nothing on disk is modified.
///
/// # Errors
/// - [`SdkError::Usage`] without a tag outside a project.
/// - [`SdkError::NotFound`] when the target directory does not exist, or when
///   the current symlink cannot be read.
/// - [`SdkError::Parse`] when the project pin is malformed.
pub fn resolve_target(
    config: &SystemConfig,
    project: Option<&Project>,
    tag: Option<&str>,
) -> Result<(SwitchSelector, PathBuf), SdkError> {
    let (selector, target) = match (tag, project) {
        (Some(tag), _) => (
            SwitchSelector::Tag(tag.to_string()),
            config.versions_dir.join(dir_name_for_tag(tag)),
        ),
        (None, None) => {
            return Err(SdkError::usage(
                "The switch command requires a version or channel argument if you are not in the root of a Flutter project.",
            ));
        }
        (None, Some(project)) => match read_pin(project)? {
            Some(pin) => {
                check_pin_dir(project, &pin)?;
                let target = config.versions_dir.join(&pin.dir);
                (SwitchSelector::ProjectPin(pin), target)
            }
            None => {
                let target = link::read_target(&config.symlink).map_err(|err| {
                    SdkError::not_found(format!(
                        "Cannot read symbolic link {}: {err}",
                        config.symlink.display()
                    ))
                })?;
                (SwitchSelector::CurrentActive, target)
            }
        },
    };

    if !target.exists() {
        return Err(SdkError::not_found(format!(
            "Directory {} doesn't exist.",
            target.display()
        )));
    }

    debug!("Switch target {selector:?} -> {}", target.display());
    Ok((selector, target))
}

/// Point the active symlink at another installation and, inside a project,
/// record the result in the project's pin file.
///
/// All validation happens before the symlink is touched.
///
/// # Errors
/// See [`resolve_target`]; additionally [`SdkError::Conflict`] when the
/// symlink path is occupied by something that is not a symlink, and any
/// failure probing the newly active SDK.
pub async fn switch<P>(
    config: &SystemConfig,
    project: Option<&Project>,
    tag: Option<&str>,
    probe: &P,
) -> Result<SwitchOutcome, SdkError>
where
    P: SdkProbe + ?Sized,
{
    let (selector, target) = resolve_target(config, project, tag)?;
    let target = std::path::absolute(&target).map_err(|err| SdkError::io_with_path(&target, &err))?;

    repoint(&config.symlink, &target)?;

    let resolved = link::read_target(&config.symlink)
        .map_err(|err| SdkError::io_with_path(&config.symlink, &err))?;
    let active = probe
        .probe(Some(config.symlink.as_path()))
        .await?
        .with_dir(link::dir_name(&resolved));
    info!(
        "Activated Flutter {} ({}) from {}",
        active.version,
        active.channel,
        resolved.display()
    );

    let pin_written = match project {
        Some(project) => {
            let pin = ProjectPin {
                version: active.version.clone(),
                channel: active.channel,
                dir: active.dir.clone().unwrap_or_default(),
            };
            write_pin(project, &pin)?;
            true
        }
        None => false,
    };

    Ok(SwitchOutcome {
        selector,
        active,
        pin_written,
    })
}

fn repoint(symlink: &Path, target: &Path) -> Result<(), SdkError> {
    link::remove_if_symlink(symlink).map_err(|err| SdkError::io_with_path(symlink, &err))?;

    if link::occupied(symlink) {
        warn!(
            "Refusing to replace {}: not a symbolic link",
            symlink.display()
        );
        return Err(SdkError::conflict(format!(
            "File {} does exist and is not a symbolic link.",
            symlink.display()
        )));
    }

    link::create_dir_link(target, symlink).map_err(|err| SdkError::io_with_path(symlink, &err))
}

// The pin names a directory inside the versions dir, never a path.
fn check_pin_dir(project: &Project, pin: &ProjectPin) -> Result<(), SdkError> {
    let mut components = Path::new(&pin.dir).components();
    let valid = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if valid {
        Ok(())
    } else {
        Err(VersionParseError::InvalidPin {
            path: project.pin_file().display().to_string(),
            details: format!("dir {:?} is not a directory name", pin.dir),
        }
        .into())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use async_trait::async_trait;
    use fv_backend::{Channel, ErrorKind, VersionField};
    use fv_platform::PROJECT_MARKER;

    use super::*;

    /// Answers by the final directory name the probed path resolves to.
    struct DirNameProbe {
        by_dir: HashMap<String, VersionInfo>,
    }

    impl DirNameProbe {
        fn new(entries: &[(&str, VersionInfo)]) -> Self {
            Self {
                by_dir: entries
                    .iter()
                    .map(|(dir, info)| ((*dir).to_string(), info.clone()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl SdkProbe for DirNameProbe {
        async fn probe(&self, sdk_dir: Option<&Path>) -> Result<VersionInfo, SdkError> {
            let missing = || SdkError::Parse(VersionParseError::Missing(VersionField::Version));
            let dir = sdk_dir.ok_or_else(missing)?;
            let real = std::fs::canonicalize(dir).map_err(SdkError::from)?;
            self.by_dir
                .get(&link::dir_name(&real))
                .cloned()
                .ok_or_else(missing)
        }
    }

    struct Fixture {
        _home: tempfile::TempDir,
        config: SystemConfig,
        project_dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(installed: &[&str]) -> Self {
            let home = tempfile::tempdir().expect("create temp home");
            let config = SystemConfig::defaults(home.path());
            for dir in installed {
                std::fs::create_dir_all(config.versions_dir.join(dir)).expect("create install");
            }
            Self {
                _home: home,
                config,
                project_dir: tempfile::tempdir().expect("create project dir"),
            }
        }

        fn project(&self) -> Project {
            std::fs::write(self.project_dir.path().join(PROJECT_MARKER), "name: app\n")
                .expect("write pubspec");
            Project::detect(self.project_dir.path()).expect("project detected")
        }

        fn link_to(&self, dir: &str) {
            link::create_dir_link(&self.config.versions_dir.join(dir), &self.config.symlink)
                .expect("create symlink");
        }

        fn linked_dir(&self) -> String {
            link::dir_name(&link::read_target(&self.config.symlink).expect("read symlink"))
        }
    }

    fn probe() -> DirNameProbe {
        DirNameProbe::new(&[
            ("flutter-3.16.2", VersionInfo::new("3.16.2", Channel::Stable)),
            ("flutter-stable", VersionInfo::new("3.16.5", Channel::Stable)),
            ("flutter-beta", VersionInfo::new("3.18.0-0.2.pre", Channel::Beta)),
        ])
    }

    #[tokio::test]
    async fn explicit_tag_repoints_existing_symlink() {
        let fx = Fixture::new(&["flutter-stable", "flutter-beta"]);
        fx.link_to("flutter-stable");

        let outcome = switch(&fx.config, None, Some("beta"), &probe())
            .await
            .expect("switch succeeds");

        assert_eq!(fx.linked_dir(), "flutter-beta");
        assert_eq!(outcome.selector, SwitchSelector::Tag("beta".to_string()));
        assert_eq!(outcome.active.channel, Channel::Beta);
        assert_eq!(outcome.active.dir.as_deref(), Some("flutter-beta"));
        assert!(!outcome.pin_written);
    }

    #[tokio::test]
    async fn first_switch_creates_the_symlink() {
        let fx = Fixture::new(&["flutter-3.16.2"]);

        switch(&fx.config, None, Some("3.16.2"), &probe())
            .await
            .expect("switch succeeds");

        assert!(link::is_symlink(&fx.config.symlink));
        assert_eq!(fx.linked_dir(), "flutter-3.16.2");
    }

    #[tokio::test]
    async fn missing_target_fails_without_touching_symlink() {
        let fx = Fixture::new(&["flutter-stable"]);
        fx.link_to("flutter-stable");

        let error = switch(&fx.config, None, Some("3.16.2"), &probe())
            .await
            .expect_err("target missing");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        let expected = fx.config.versions_dir.join("flutter-3.16.2");
        assert_eq!(
            error.to_string(),
            format!("Directory {} doesn't exist.", expected.display())
        );
        assert_eq!(fx.linked_dir(), "flutter-stable");
    }

    #[tokio::test]
    async fn no_tag_outside_project_is_usage_error() {
        let fx = Fixture::new(&["flutter-stable"]);

        let error = switch(&fx.config, None, None, &probe())
            .await
            .expect_err("no target");

        assert_eq!(error.kind(), ErrorKind::Usage);
        assert!(!link::occupied(&fx.config.symlink));
    }

    #[tokio::test]
    async fn no_tag_in_pinned_project_follows_pin() {
        let fx = Fixture::new(&["flutter-stable", "flutter-3.16.2"]);
        fx.link_to("flutter-stable");
        let project = fx.project();
        crate::pin::write_pin(
            &project,
            &ProjectPin {
                version: "3.16.2".to_string(),
                channel: Channel::Stable,
                dir: "flutter-3.16.2".to_string(),
            },
        )
        .expect("seed pin");

        let outcome = switch(&fx.config, Some(&project), None, &probe())
            .await
            .expect("switch succeeds");

        assert_eq!(fx.linked_dir(), "flutter-3.16.2");
        assert!(matches!(outcome.selector, SwitchSelector::ProjectPin(_)));
        assert!(outcome.pin_written);
    }

    #[tokio::test]
    async fn no_tag_in_unpinned_project_pins_current_active() {
        let fx = Fixture::new(&["flutter-beta"]);
        fx.link_to("flutter-beta");
        let project = fx.project();

        let outcome = switch(&fx.config, Some(&project), None, &probe())
            .await
            .expect("switch succeeds");

        assert_eq!(outcome.selector, SwitchSelector::CurrentActive);
        assert_eq!(fx.linked_dir(), "flutter-beta");
        let pin = read_pin(&project).expect("read pin").expect("pin written");
        assert_eq!(
            pin,
            ProjectPin {
                version: "3.18.0-0.2.pre".to_string(),
                channel: Channel::Beta,
                dir: "flutter-beta".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn no_tag_in_unpinned_project_without_symlink_is_not_found() {
        let fx = Fixture::new(&["flutter-beta"]);
        let project = fx.project();

        let error = switch(&fx.config, Some(&project), None, &probe())
            .await
            .expect_err("nothing active");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(!project.pin_file().exists());
    }

    #[tokio::test]
    async fn explicit_tag_in_project_overwrites_pin() {
        let fx = Fixture::new(&["flutter-stable", "flutter-beta"]);
        fx.link_to("flutter-stable");
        let project = fx.project();

        switch(&fx.config, Some(&project), Some("stable"), &probe())
            .await
            .expect("first switch");
        switch(&fx.config, Some(&project), Some("beta"), &probe())
            .await
            .expect("second switch");

        let pin = read_pin(&project).expect("read pin").expect("pin written");
        assert_eq!(pin.dir, "flutter-beta");
        assert_eq!(pin.channel, Channel::Beta);
    }

    #[tokio::test]
    async fn real_directory_at_symlink_path_is_a_conflict() {
        let fx = Fixture::new(&["flutter-beta"]);
        std::fs::create_dir_all(fx.config.symlink.join("bin")).expect("create real sdk dir");

        let error = switch(&fx.config, None, Some("beta"), &probe())
            .await
            .expect_err("must not clobber");

        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert!(fx.config.symlink.join("bin").is_dir());
    }

    #[tokio::test]
    async fn pin_with_path_in_dir_is_rejected() {
        let fx = Fixture::new(&["flutter-beta"]);
        let project = fx.project();
        std::fs::write(
            project.pin_file(),
            r#"{"version":"3.16.2","channel":"stable","dir":"../flutter-beta"}"#,
        )
        .expect("write pin");

        let error = switch(&fx.config, Some(&project), None, &probe())
            .await
            .expect_err("pin dir escapes versions dir");

        assert_eq!(error.kind(), ErrorKind::Parse);
        assert!(!link::occupied(&fx.config.symlink));
    }

    #[test]
    fn outcome_message_mentions_pin_only_when_written() {
        let active = VersionInfo::new("3.16.2", Channel::Stable).with_dir("flutter-3.16.2");
        let mut outcome = SwitchOutcome {
            selector: SwitchSelector::Tag("3.16.2".to_string()),
            active,
            pin_written: false,
        };

        assert_eq!(
            outcome.to_string(),
            "Flutter version 3.16.2 (stable) activated, path = flutter-3.16.2"
        );

        outcome.pin_written = true;
        assert_eq!(
            outcome.to_string(),
            "Flutter version 3.16.2 (stable) activated, path = flutter-3.16.2 - also written into the project .flutter-version.json file"
        );
    }

    #[test]
    fn resolve_target_does_not_touch_disk() {
        let fx = Fixture::new(&["flutter-beta"]);

        let (selector, target) =
            resolve_target(&fx.config, None, Some("beta")).expect("resolve target");

        assert_eq!(selector, SwitchSelector::Tag("beta".to_string()));
        assert_eq!(target, fx.config.versions_dir.join("flutter-beta"));
        assert!(!link::occupied(&fx.config.symlink));
    }
}
