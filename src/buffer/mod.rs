//! Fixed-capacity PDU buffers with headroom/tailroom bookkeeping.
//!
//! Buffers never grow: capacity is fixed at compile time and a movable
//! payload start leaves room for in-place header prepending. Ownership is
//! single-writer, single-reader; move the buffer (or its pool handle)
//! between pipeline stages instead of sharing it.

mod bit;
mod byte;
mod latency;
mod span;

pub use bit::BitBuffer;
pub use byte::{BufferMeta, ByteBuffer};
pub use latency::LatencyStamp;
pub use span::{make_span, make_span_mut, Payload, PayloadMut};
