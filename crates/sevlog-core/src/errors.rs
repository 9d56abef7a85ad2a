use thiserror::Error;

/// Result type alias using SevlogError
pub type Result<T> = std::result::Result<T, SevlogError>;

/// Canonical error kind taxonomy
///
/// Tests and callers match on the kind (or its stable code) instead of the
/// rendered message, so "nothing was logged" stays distinguishable from
/// "the capture stream broke".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognised severity name supplied to a threshold setter
    InvalidLevel,
    /// Malformed serialized record seen by the capture decoder
    Decode,
    /// Nothing arrived within the polling window
    Timeout,
    /// Operation on a closed capture logger
    Closed,
    /// Bad value in an environment variable or settings file
    InvalidSetting,
    Io,
    Serialization,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidLevel => "ERR_INVALID_LEVEL",
            ErrorKind::Decode => "ERR_DECODE",
            ErrorKind::Timeout => "ERR_TIMEOUT",
            ErrorKind::Closed => "ERR_CLOSED",
            ErrorKind::InvalidSetting => "ERR_INVALID_SETTING",
            ErrorKind::Io => "ERR_IO",
            ErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Error taxonomy for sevlog operations
#[derive(Error, Debug)]
pub enum SevlogError {
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    #[error("unable to decode log message: {0}")]
    Decode(String),

    #[error("no log messages found")]
    NoMessages,

    #[error("logger closed")]
    Closed,

    #[error("invalid setting {key}: {value}")]
    InvalidSetting { key: String, value: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SevlogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SevlogError::InvalidLevel(_) => ErrorKind::InvalidLevel,
            SevlogError::Decode(_) => ErrorKind::Decode,
            SevlogError::NoMessages => ErrorKind::Timeout,
            SevlogError::Closed => ErrorKind::Closed,
            SevlogError::InvalidSetting { .. } => ErrorKind::InvalidSetting,
            SevlogError::Io(_) => ErrorKind::Io,
            SevlogError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            SevlogError::InvalidLevel("LOUD".into()).kind(),
            ErrorKind::InvalidLevel
        );
        assert_eq!(SevlogError::NoMessages.kind(), ErrorKind::Timeout);
        assert_eq!(SevlogError::Closed.kind(), ErrorKind::Closed);
        assert_eq!(SevlogError::Decode("x".into()).code(), "ERR_DECODE");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SevlogError::InvalidLevel("LOUD".into()).to_string(),
            "invalid log level: LOUD"
        );
        assert_eq!(SevlogError::NoMessages.to_string(), "no log messages found");
        assert_eq!(SevlogError::Closed.to_string(), "logger closed");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SevlogError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.code(), "ERR_IO");
    }
}
