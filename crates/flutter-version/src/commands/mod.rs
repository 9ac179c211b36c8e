pub mod install;
pub mod list;
pub mod path;
pub mod switch;
pub mod uninstall;
pub mod versioned;

use log::debug;

use fv_backend::SdkError;
use fv_platform::{Project, SystemConfig};

/// Everything a command needs to know about where it runs.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: SystemConfig,
    pub project: Option<Project>,
}

impl Context {
    /// Resolve paths for the current user and working directory.
    pub fn load() -> Result<Self, SdkError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SdkError::config("Cannot determine the home directory"))?;
        let config = SystemConfig::resolve(&home)?;
        let cwd = std::env::current_dir()?;
        let project = Project::detect(&cwd);

        debug!(
            "versions dir {}, symlink {}, project {:?}",
            config.versions_dir.display(),
            config.symlink.display(),
            project.as_ref().map(Project::root)
        );
        Ok(Self { config, project })
    }
}
