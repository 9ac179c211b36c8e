//! flutter-version - install and switch between Flutter SDK versions.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod logging;
mod table;

use commands::Context;
use error::AppError;

/// Set to any non-empty value to write the debug log without `--verbose`.
const DEBUG_ENV: &str = "FLUTTER_VERSION_DEBUG";
const MAX_LOG_SIZE: u64 = 1024 * 1024;
const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "flutter-version")]
#[command(version, about = "Install, list and switch between Flutter SDK versions")]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download and install a Flutter release
    Install {
        /// Release to install, e.g. 3.16.2 or 3.18.0-0.2.pre
        tag: String,
        /// Release channel: stable or beta
        channel: Option<String>,
    },
    /// Remove an installed release
    Uninstall {
        /// Installed release, as shown in the tag column of `list`
        tag: String,
    },
    /// List installed releases
    List,
    /// Activate an installed release, or the project's pinned one
    Switch {
        /// Release or channel to activate
        tag: Option<String>,
    },
    /// Print 1 if the active Flutter is a fixed release, 0 otherwise
    Versioned,
    /// Print the path of the active flutter executable
    Path,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Install { .. } => "install",
            Self::Uninstall { .. } => "uninstall",
            Self::List => "list",
            Self::Switch { .. } => "switch",
            Self::Versioned => "versioned",
            Self::Path => "path",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(parse_exit_status(&err));
        }
    };

    let debug_env = std::env::var_os(DEBUG_ENV).is_some_and(|value| !value.is_empty());
    logging::init_logging(cli.verbose, cli.verbose || debug_env, MAX_LOG_SIZE);

    let result = run(cli.command).await;
    ExitCode::from(report(result, &mut std::io::stderr()))
}

/// `--help` and `--version` succeed; every other parse error is a usage
/// failure with the same status as a failed command.
fn parse_exit_status(err: &clap::Error) -> u8 {
    if err.use_stderr() { EXIT_FAILURE } else { 0 }
}

fn report(result: Result<(), AppError>, stderr: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(error) => {
            log::error!("{error}");
            let _ = writeln!(stderr, "ERROR: {}", error.user_message());
            EXIT_FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), AppError> {
    let name = command.name();
    log::debug!("Running {name}: {command:?}");

    let ctx = Context::load().map_err(|err| AppError::command_failed(name, err))?;
    let mut out = std::io::stdout();

    let result = match command {
        Commands::Install { tag, channel } => {
            commands::install::run(&ctx, &tag, channel.as_deref()).await
        }
        Commands::Uninstall { tag } => commands::uninstall::run(&ctx, &tag).await,
        Commands::List => commands::list::run(&ctx, &mut out).await,
        Commands::Switch { tag } => commands::switch::run(&ctx, tag.as_deref(), &mut out).await,
        Commands::Versioned => commands::versioned::run(&ctx, &mut out),
        Commands::Path => commands::path::run(&ctx, &mut out),
    };

    result.map_err(|err| AppError::command_failed(name, err))
}
