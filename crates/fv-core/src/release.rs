use fv_backend::Channel;

pub const DEFAULT_STORAGE_BASE_URL: &str = "https://storage.googleapis.com";

/// Same variable the Flutter tool reads to use a mirror.
pub const STORAGE_BASE_URL_ENV: &str = "FLUTTER_STORAGE_BASE_URL";

/// Name of the directory every SDK archive unpacks to.
pub const ARCHIVE_ROOT_DIR: &str = "flutter";

/// A downloadable macOS SDK release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArchive {
    pub tag: String,
    pub channel: Channel,
    pub arm64: bool,
}

impl ReleaseArchive {
    #[must_use]
    pub fn for_host(tag: impl Into<String>, channel: Channel) -> Self {
        Self {
            tag: tag.into(),
            channel,
            arm64: std::env::consts::ARCH == "aarch64",
        }
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        let arch = if self.arm64 { "arm64_" } else { "" };
        format!("flutter_macos_{arch}{}-{}.zip", self.tag, self.channel)
    }

    #[must_use]
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/flutter_infra_release/releases/{}/macos/{}",
            base_url.trim_end_matches('/'),
            self.channel,
            self.file_name()
        )
    }
}

/// The storage host to download from, honoring `FLUTTER_STORAGE_BASE_URL`.
#[must_use]
pub fn storage_base_url() -> String {
    std::env::var(STORAGE_BASE_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STORAGE_BASE_URL.to_string())
}
