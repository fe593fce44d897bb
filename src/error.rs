use std::error::Error;
use std::fmt;

/// Everything that can abort a run. There is no partial-success mode:
/// whichever of these surfaces first terminates the process.
#[derive(Debug)]
pub enum RecapError {
    /// History file missing, unreadable, or not a regular file.
    Input(String),
    /// The backing database could not be opened or written.
    Storage(rusqlite::Error),
    /// A caller-supplied analysis parameter was out of range.
    Validation(String),
}

impl fmt::Display for RecapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecapError::Input(msg) => write!(f, "input error: {}", msg),
            RecapError::Storage(err) => write!(f, "storage error: {}", err),
            RecapError::Validation(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl Error for RecapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RecapError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RecapError {
    fn from(err: rusqlite::Error) -> Self {
        RecapError::Storage(err)
    }
}
