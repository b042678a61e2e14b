//! Fixed-capacity bit buffer for sub-byte-granular payloads.
//!
//! Structurally a sibling of the byte buffer with length counted in bits.
//! Bits are stored unpacked, one storage byte per bit, which keeps soft-bit
//! processing simple. Deliberately narrower than the byte variant: no append
//! or prepend, only construction, bounded copy, clear, and headroom query.

use std::fmt;

use crate::config::{BIT_BUFFER_CAPACITY, HEADER_OFFSET};

/// Fixed-capacity buffer whose length is measured in bits.
///
/// Same headroom model and single-owner discipline as
/// [`ByteBuffer`](crate::buffer::ByteBuffer).
pub struct BitBuffer {
    data: [u8; BIT_BUFFER_CAPACITY],
    offset: usize,
    len: usize,
}

impl BitBuffer {
    /// Largest bit count a buffer constructed with the default headroom can
    /// hold.
    pub const MAX_BITS: usize = BIT_BUFFER_CAPACITY - HEADER_OFFSET;

    /// Create an empty bit buffer with the default headroom reserved.
    pub fn new() -> Self {
        Self {
            data: [0; BIT_BUFFER_CAPACITY],
            offset: HEADER_OFFSET,
            len: 0,
        }
    }

    /// Create a bit buffer whose length is already `len` bits, zeroed.
    ///
    /// Panics if `len` exceeds [`BitBuffer::MAX_BITS`]; oversized requests
    /// are contract violations, never silently truncated.
    pub fn with_len(len: usize) -> Self {
        assert!(
            len <= Self::MAX_BITS,
            "bit count {} exceeds buffer capacity {}",
            len,
            Self::MAX_BITS
        );
        let mut buf = Self::new();
        buf.len = len;
        buf
    }

    /// Reset to an empty buffer with the default headroom. The backing
    /// storage is not scrubbed.
    pub fn clear(&mut self) {
        self.offset = HEADER_OFFSET;
        self.len = 0;
    }

    /// Unused storage bytes in front of the first valid bit.
    #[inline]
    pub fn headroom(&self) -> usize {
        self.offset
    }

    /// Number of valid bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The valid bits, one storage byte per bit.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[self.offset..self.offset + self.len]
    }

    /// Mutable view of the valid bits.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        let end = self.offset + self.len;
        &mut self.data[self.offset..end]
    }
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded deep copy: only the valid bits are copied, into a fresh default
/// headroom position.
impl Clone for BitBuffer {
    fn clone(&self) -> Self {
        let mut buf = Self::new();
        buf.clone_from(self);
        buf
    }

    fn clone_from(&mut self, source: &Self) {
        self.offset = HEADER_OFFSET;
        self.len = source.len;
        self.data[HEADER_OFFSET..HEADER_OFFSET + source.len].copy_from_slice(source.data());
    }
}

/// Equality over the valid bits; headroom position does not participate.
impl PartialEq for BitBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data() == other.data()
    }
}

impl Eq for BitBuffer {}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitBuffer")
            .field("len_bits", &self.len)
            .field("headroom", &self.offset)
            .finish()
    }
}
