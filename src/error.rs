use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds for the editing core. The orchestration layer (CLI, UI)
/// is responsible for surfacing these to the user; no function here
/// reports anything itself.
#[derive(Debug)]
pub enum Error {
    /// The literal prefix required by the selected offset notation is absent.
    FormatMismatch { expected: &'static str },
    /// The offset text is not a number in any accepted radix.
    ParseError(String),
    /// An offset or range extends past the end of the loaded ROM.
    OutOfBounds { offset: usize, len: usize },
    /// A range has its bounds reversed or ends past the ROM.
    InvalidRange { start: usize, end: usize },
    /// A size argument is zero or exceeds the remaining ROM length.
    InvalidSize(usize),
    /// An operation that needs ROM contents ran before any load.
    NoRomLoaded,
    /// No matching free-space run, or a file path that does not resolve.
    NotFound(String),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FormatMismatch { expected } => {
                write!(f, "expected offset to start with '{}'", expected)
            }
            Error::ParseError(raw) => write!(f, "malformed offset: {}", raw),
            Error::OutOfBounds { offset, len } => {
                write!(f, "offset 0x{:X} out of bounds (ROM is {} bytes)", offset, len)
            }
            Error::InvalidRange { start, end } => {
                write!(f, "invalid range 0x{:X}..=0x{:X}", start, end)
            }
            Error::InvalidSize(size) => write!(f, "invalid size: {}", size),
            Error::NoRomLoaded => write!(f, "no ROM loaded"),
            Error::NotFound(what) => write!(f, "{}", what),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
