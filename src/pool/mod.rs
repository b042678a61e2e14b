//! Pool-backed allocation for fixed-capacity buffers.
//!
//! Buffer construction and destruction are routed to a pre-allocated pool
//! keyed by the single fixed size class, instead of the general-purpose
//! allocator, so the per-packet hot path never touches the heap.

mod buffer;

pub use buffer::{buffer_pool, init_buffer_pool, BufferPool, PooledBuffer};
