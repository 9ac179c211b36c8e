use async_trait::async_trait;
use std::path::Path;

use crate::error::SdkError;
use crate::types::VersionInfo;

/// Asks an SDK installation which version and channel it is.
///
/// `sdk_dir` is the root of an installation (the directory holding `bin/`).
/// `None` means whatever `flutter` the shell would pick up from `PATH`.
#[async_trait]
pub trait SdkProbe: Send + Sync {
    async fn probe(&self, sdk_dir: Option<&Path>) -> Result<VersionInfo, SdkError>;
}

#[async_trait]
impl<T: SdkProbe + ?Sized> SdkProbe for &T {
    async fn probe(&self, sdk_dir: Option<&Path>) -> Result<VersionInfo, SdkError> {
        (**self).probe(sdk_dir).await
    }
}
