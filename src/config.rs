//! Size-class constants and pool configuration.
//!
//! Buffer capacities are fixed at compile time; the pool allocates a single
//! size class and never grows a buffer at runtime.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed backing capacity of a byte buffer, sized for the largest
/// transport-block PDU the pipeline carries.
pub const BYTE_BUFFER_CAPACITY: usize = 12_756;

/// Fixed backing capacity of a bit buffer. Bits are stored unpacked, one
/// storage byte per bit.
pub const BIT_BUFFER_CAPACITY: usize = 102_048;

/// Default headroom reserved at the front of every buffer so protocol
/// headers can be prepended in place without shifting the payload.
pub const HEADER_OFFSET: usize = 1_020;

/// Default number of buffers a pool pre-allocates.
pub const DEFAULT_POOL_CAPACITY: usize = 1_024;

/// Buffer pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of buffers pre-allocated at pool construction. The pool never
    /// allocates past this count; exhaustion is surfaced to the caller.
    pub capacity: usize,
}

impl PoolConfig {
    /// Create a config for a pool of `capacity` buffers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check the configuration for values the pool cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig(
                "pool capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}
