mod commands;
mod config;
pub mod link;
mod paths;
mod project;

pub use commands::{flutter_command, flutter_executable, tool_command};
pub use config::{CONFIG_FILE_NAME, SystemConfig};
pub use paths::{AppPaths, AppPathsError};
pub use project::{PROJECT_MARKER, Project};
