use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Parse(#[from] crate::types::VersionParseError),

    #[error("{operation} failed: {details}")]
    Transport {
        operation: &'static str,
        details: String,
    },

    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Config,
    NotFound,
    Conflict,
    Parse,
    Transport,
    Io,
}

impl SdkError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn transport(operation: &'static str, details: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            details: details.into(),
        }
    }

    pub fn transport_from<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::transport(operation, error.to_string())
    }

    /// Attach a path to an I/O failure so the message names what was touched.
    pub fn io_with_path(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: format!("{}: {err}", path.display()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage(_) => ErrorKind::Usage,
            Self::Config(_) => ErrorKind::Config,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
