pub mod buffer;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pool;

pub use buffer::{
    make_span, make_span_mut, BitBuffer, BufferMeta, ByteBuffer, LatencyStamp, Payload, PayloadMut,
};
pub use config::{PoolConfig, BIT_BUFFER_CAPACITY, BYTE_BUFFER_CAPACITY, HEADER_OFFSET};
pub use error::{Error, Result};
pub use pool::{buffer_pool, init_buffer_pool, BufferPool, PooledBuffer};
