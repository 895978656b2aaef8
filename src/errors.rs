use std::error::Error;
use std::fmt;

/// Error taxonomy for the simulator: configuration failures (bad cache
/// geometry, conflicting or gapped level specs, unknown CLI options) and
/// I/O failures (trace file not openable). Parse errors inside the trace
/// itself are not represented here — per the simulator's contract they
/// terminate the read loop and the run proceeds to flush and report.
#[derive(Debug)]
pub enum CacheSimError {
    Config(String),
    Io(std::io::Error),
}

impl CacheSimError {
    pub fn config(message: impl Into<String>) -> Self {
        CacheSimError::Config(message.into())
    }
}

impl fmt::Display for CacheSimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheSimError::Config(msg) => write!(f, "configuration error: {}", msg),
            CacheSimError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for CacheSimError {}

impl From<std::io::Error> for CacheSimError {
    fn from(error: std::io::Error) -> Self {
        CacheSimError::Io(error)
    }
}
