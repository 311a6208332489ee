//! Unified error type.

use std::fmt;

/// The error type returned by the crate's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures (binding to a port, accepting a connection) and
/// malformed middleware configuration, which is rejected at construction.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Config(String),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e)     => write!(f, "io: {e}"),
            Self::Config(m) => write!(f, "invalid configuration: {m}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e)     => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn config_error_has_no_source() {
        let err = Error::config("path must start with `/`");
        assert_eq!(err.to_string(), "invalid configuration: path must start with `/`");
        assert!(err.source().is_none());
    }

    #[test]
    fn io_error_keeps_its_source() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken"));
        assert_eq!(err.to_string(), "io: taken");
        assert!(err.source().is_some());
    }
}
