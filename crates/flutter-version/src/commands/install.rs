use std::io::Write;

use log::{debug, info};
use tokio::sync::mpsc;

use fv_backend::SdkError;
use fv_core::{DownloadProgress, HttpDownloader};
use fv_flutter::{InstallRequest, Installer};

use super::Context;

pub async fn run(ctx: &Context, tag: &str, channel: Option<&str>) -> Result<(), SdkError> {
    let request = InstallRequest::parse(tag, channel)?;
    let installer = Installer::new(HttpDownloader::new(reqwest::Client::new()));

    let (tx, rx) = mpsc::channel(64);
    let printer = tokio::spawn(print_progress(rx));

    let result = installer
        .install(&request, &ctx.config.versions_dir, &tx)
        .await;
    drop(tx);
    if let Err(err) = printer.await {
        debug!("Progress printer stopped: {err}");
    }

    let target = result?;
    info!("Installed {} into {}", request.tag, target.display());
    Ok(())
}

async fn print_progress(mut rx: mpsc::Receiver<DownloadProgress>) {
    let mut last = None;
    let mut stdout = std::io::stdout();
    while let Some(event) = rx.recv().await {
        if let Some(line) = progress_line(&mut last, event) {
            let _ = stdout.write_all(line.as_bytes());
            let _ = stdout.flush();
        }
    }
}

/// Text to print for a progress event, if any. Percentages are only printed
/// when they grow; the final event ends the line.
fn progress_line(last: &mut Option<u64>, event: DownloadProgress) -> Option<String> {
    match event {
        DownloadProgress::Downloading { total, .. } => {
            let percent = event.percent()?;
            if last.is_some_and(|previous| percent <= previous) {
                return None;
            }
            *last = Some(percent);
            Some(format!("Downloaded {percent}% of {total} bytes\r"))
        }
        DownloadProgress::Finished { .. } => Some("\n".to_string()),
    }
}
