//! Console error types

/// Console error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Invalid value format
    InvalidValue,
    /// E03: Missing required argument
    MissingArg,
    /// E04: Network setup was already started
    AlreadyStarted,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidValue => "E02",
            Self::MissingArg => "E03",
            Self::AlreadyStarted => "E04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidValue => "invalid value",
            Self::MissingArg => "missing argument",
            Self::AlreadyStarted => "setup already started",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
