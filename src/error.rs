use std::fmt;

/// Unified error type for buffer and pool operations
#[derive(Debug)]
pub enum Error {
    /// Pool has no free buffers left
    PoolExhausted,

    /// Requested byte count exceeds the remaining room in a buffer
    CapacityExceeded { requested: usize, available: usize },

    /// Pool configuration rejected
    InvalidConfig(String),

    /// Global pool was already initialized
    AlreadyInitialized,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PoolExhausted => write!(f, "buffer pool exhausted"),
            Error::CapacityExceeded {
                requested,
                available,
            } => write!(
                f,
                "requested {} bytes but only {} available",
                requested, available
            ),
            Error::InvalidConfig(msg) => write!(f, "invalid pool config: {}", msg),
            Error::AlreadyInitialized => write!(f, "buffer pool already initialized"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for buffer and pool operations
pub type Result<T> = std::result::Result<T, Error>;
