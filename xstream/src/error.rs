use core::fmt;

/// Failure categories for the fallible edges of the crate.
///
/// Inserting, pushing and popping never fail; these kinds only come from
/// trace parsing, configuration checks and the `std::io` adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A segment line is missing its offset or flag.
    MissingField,
    /// The offset field is not a valid `u64`.
    InvalidOffset,
    /// The flag field is neither `-` nor `F`.
    InvalidFlag,
    /// The configured capacity cannot be addressed on this target.
    InvalidCapacity,
    /// The configured maximum segment size is zero.
    InvalidSegmentSize,
    /// Write attempted after the stream was closed.
    StreamClosed,
    /// The stream carries the sticky error flag.
    StreamErrored,
    /// No bytes buffered yet, but the stream is not finished.
    WouldBlock,
}

/// Error type for xstream.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Error { kind }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::MissingField => write!(f, "Segment line is missing a field"),
            ErrorKind::InvalidOffset => write!(f, "Invalid segment offset"),
            ErrorKind::InvalidFlag => write!(f, "Invalid segment flag"),
            ErrorKind::InvalidCapacity => write!(f, "Invalid capacity"),
            ErrorKind::InvalidSegmentSize => write!(f, "Invalid maximum segment size"),
            ErrorKind::StreamClosed => write!(f, "Stream is closed for writing"),
            ErrorKind::StreamErrored => write!(f, "Stream reported an error"),
            ErrorKind::WouldBlock => write!(f, "No data available yet"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(err: Error) -> std::io::Error {
        let kind = match err.kind {
            ErrorKind::StreamClosed => std::io::ErrorKind::BrokenPipe,
            ErrorKind::WouldBlock => std::io::ErrorKind::WouldBlock,
            ErrorKind::MissingField | ErrorKind::InvalidOffset | ErrorKind::InvalidFlag => {
                std::io::ErrorKind::InvalidData
            }
            ErrorKind::InvalidCapacity | ErrorKind::InvalidSegmentSize => {
                std::io::ErrorKind::InvalidInput
            }
            ErrorKind::StreamErrored => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::new(ErrorKind::InvalidFlag).to_string(),
            "Invalid segment flag"
        );
    }

    #[test]
    fn test_io_error_kind() {
        let err: std::io::Error = Error::new(ErrorKind::WouldBlock).into();
        assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);

        let err: std::io::Error = Error::from(ErrorKind::StreamClosed).into();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
