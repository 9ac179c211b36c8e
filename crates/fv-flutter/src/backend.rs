use async_trait::async_trait;
use log::{debug, error, info, trace};
use std::path::Path;

use fv_backend::{SdkError, SdkProbe, VersionInfo};
use fv_platform::flutter_command;

use crate::version::parse_version_banner;

/// Runs the real `flutter --version` of an installation and parses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlutterProbe;

impl FlutterProbe {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn execute(&self, sdk_dir: Option<&Path>, args: &[&str]) -> Result<String, SdkError> {
        let target = sdk_dir.map_or_else(|| "PATH".to_string(), |d| d.display().to_string());
        info!("Executing flutter {} ({target})", args.join(" "));

        let output = flutter_command(sdk_dir, args)
            .output()
            .await
            .map_err(|err| {
                error!("Failed to start flutter for {target}: {err}");
                SdkError::transport_from("running flutter", format!("{target}: {err}"))
            })?;

        debug!("flutter exit status: {:?}", output.status);
        trace!("flutter stdout: {}", String::from_utf8_lossy(&output.stdout));
        if !output.stderr.is_empty() {
            trace!("flutter stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("flutter command failed: args={args:?}, stderr='{stderr}'");
            Err(SdkError::transport(
                "running flutter",
                format!("{target} exited with {}: {stderr}", output.status),
            ))
        }
    }
}

#[async_trait]
impl SdkProbe for FlutterProbe {
    async fn probe(&self, sdk_dir: Option<&Path>) -> Result<VersionInfo, SdkError> {
        let output = self.execute(sdk_dir, &["--version"]).await?;
        Ok(parse_version_banner(&output)?)
    }
}
