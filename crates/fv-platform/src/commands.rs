use std::path::{Path, PathBuf};

use tokio::process::Command;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[cfg(windows)]
const FLUTTER_EXECUTABLE: &str = "flutter.bat";
#[cfg(not(windows))]
const FLUTTER_EXECUTABLE: &str = "flutter";

/// Path of the `flutter` launcher inside an SDK root.
#[must_use]
pub fn flutter_executable(sdk_dir: &Path) -> PathBuf {
    sdk_dir.join("bin").join(FLUTTER_EXECUTABLE)
}

/// Build a `flutter` invocation for the SDK rooted at `sdk_dir`, or for the
/// `flutter` found on `PATH` when `sdk_dir` is `None`.
#[must_use]
pub fn flutter_command(sdk_dir: Option<&Path>, args: &[&str]) -> Command {
    let program = sdk_dir.map_or_else(|| PathBuf::from(FLUTTER_EXECUTABLE), flutter_executable);
    let mut cmd = Command::new(program);
    cmd.args(args);
    // Keeps first-run analytics notices out of the banner we parse.
    cmd.env("FLUTTER_SUPPRESS_ANALYTICS", "true");
    hide_window(&mut cmd);
    cmd
}

/// Build a command for an arbitrary helper tool such as `unzip`.
#[must_use]
pub fn tool_command(program: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    hide_window(&mut cmd);
    cmd
}

#[cfg(windows)]
fn hide_window(cmd: &mut Command) {
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_window(_cmd: &mut Command) {}
