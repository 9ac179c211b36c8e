use fv_backend::SdkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    CommandFailed {
        command: &'static str,
        details: SdkError,
    },
}

impl AppError {
    pub fn command_failed(command: &'static str, details: impl Into<SdkError>) -> Self {
        Self::CommandFailed {
            command,
            details: details.into(),
        }
    }

    /// What the user sees. The command name only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::CommandFailed { details, .. } => details.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CommandFailed { command, details } => {
                write!(f, "{command} failed ({:?}): {details}", details.kind())
            }
        }
    }
}

impl std::error::Error for AppError {}
