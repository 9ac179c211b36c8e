mod error;
mod traits;
mod types;

pub use error::{ErrorKind, SdkError};
pub use traits::SdkProbe;
pub use types::{
    Channel, InstalledEntry, ProjectPin, TagKind, VersionField, VersionInfo, VersionParseError,
};
