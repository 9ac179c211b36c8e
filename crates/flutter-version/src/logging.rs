use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fv_platform::AppPaths;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

/// Install the file logger, plus a stderr logger when `to_terminal` is set.
/// Nothing is recorded unless `enabled`; stdout is never written to.
pub fn init_logging(to_terminal: bool, enabled: bool, max_log_size: u64) {
    let level = max_level(to_terminal, enabled);
    if level == LevelFilter::Off {
        log::set_max_level(level);
        return;
    }

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("flutter_version")
        .add_filter_allow_str("fv_")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    let log_path = match AppPaths::new()
        .ok()
        .and_then(|paths| open_log_file(&paths, max_log_size).ok())
    {
        Some((path, file)) => {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config.clone(), file));
            Some(path)
        }
        None => None,
    };
    if to_terminal {
        loggers.push(TermLogger::new(
            LevelFilter::Trace,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
    log::set_max_level(level);

    if let Some(path) = log_path {
        log::info!("Debug logging initialized, log file: {}", path.display());
    }
}

/// The file log stops at debug; raw subprocess output (trace) only reaches
/// the terminal.
fn max_level(to_terminal: bool, enabled: bool) -> LevelFilter {
    match (enabled, to_terminal) {
        (false, _) => LevelFilter::Off,
        (true, true) => LevelFilter::Trace,
        (true, false) => LevelFilter::Debug,
    }
}

fn open_log_file(paths: &AppPaths, max_log_size: u64) -> io::Result<(PathBuf, File)> {
    paths.ensure_dirs()?;
    let path = paths.log_file();
    trim_to_recent_half(&path, max_log_size)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// Once the log grows past `max_size`, drop its older half, cutting at a
/// line boundary.
fn trim_to_recent_half(path: &Path, max_size: u64) -> io::Result<()> {
    let size = match std::fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if size <= max_size {
        return Ok(());
    }

    let contents = std::fs::read(path)?;
    let middle = contents.len() / 2;
    let cut = contents[middle..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(middle, |offset| middle + offset + 1);
    std::fs::write(path, &contents[cut..])
}
