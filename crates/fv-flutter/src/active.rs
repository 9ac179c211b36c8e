use std::path::PathBuf;

use fv_backend::SdkError;
use fv_platform::{SystemConfig, link};

use crate::version::is_versioned_directory_name;

/// Where the active symlink points.
///
/// # Errors
/// Returns [`SdkError::NotFound`] when the symlink path is missing or is not
/// a symlink.
pub fn active_target(config: &SystemConfig) -> Result<PathBuf, SdkError> {
    if !link::is_symlink(&config.symlink) {
        return Err(SdkError::not_found("Cannot get symbolic link"));
    }
    link::read_target(&config.symlink).map_err(|err| SdkError::io_with_path(&config.symlink, &err))
}

/// Whether the active installation is a fixed release rather than a channel
/// checkout.
///
/// # Errors
/// See [`active_target`].
pub fn active_is_versioned(config: &SystemConfig) -> Result<bool, SdkError> {
    active_target(config).map(|target| is_versioned_directory_name(&target))
}

/// The `flutter` launcher inside the active installation. Always uses `/`
/// since shells source this output.
///
/// # Errors
/// See [`active_target`].
pub fn active_executable(config: &SystemConfig) -> Result<String, SdkError> {
    active_target(config).map(|target| format!("{}/bin/flutter", target.display()))
}
