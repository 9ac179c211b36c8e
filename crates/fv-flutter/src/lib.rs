//! Flutter SDK management on top of the shared backend types.
//!
//! Everything here needs to know what an installed SDK looks like on disk
//! or how its `flutter` launcher reports itself.

mod active;
mod backend;
mod install;
mod pin;
mod registry;
mod switch;
mod uninstall;
mod version;

pub use active::{active_executable, active_is_versioned, active_target};
pub use backend::FlutterProbe;
pub use install::{InstallRequest, Installer};
pub use pin::{read_pin, write_pin};
pub use registry::{installed_tags, list_installed, mismatch_note};
pub use switch::{SwitchOutcome, SwitchSelector, resolve_target, switch};
pub use uninstall::uninstall;
pub use version::{
    DIR_PREFIX, classify_tag, dir_name_for_tag, is_versioned_directory_name,
    parse_version_banner, tag_of_dir_name,
};
