//! Fixed-capacity byte buffer with headroom for in-place header prepending.
//!
//! The backing storage never grows; a movable payload start inside it leaves
//! headroom in front of the payload and tailroom behind it, so headers can be
//! added without shifting or reallocating.

use std::fmt;
use std::time::Instant;

use bytes::Bytes;

use crate::buffer::latency::LatencyStamp;
use crate::config::{BYTE_BUFFER_CAPACITY, HEADER_OFFSET};
use crate::error::{Error, Result};

/// Metadata attached to the payload, not just the bytes. Copied verbatim
/// through buffer copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferMeta {
    /// Upper-layer sequence number. Written and read directly by the layers
    /// that own the buffer; the buffer itself never interprets it.
    pub seq: u32,

    /// Production timestamp for pipeline latency measurement.
    pub latency: LatencyStamp,
}

/// Fixed-capacity byte buffer.
///
/// Invariant, enforced by every mutating operation:
/// `offset <= BYTE_BUFFER_CAPACITY` and
/// `offset + len <= BYTE_BUFFER_CAPACITY`. Headroom is `offset`, tailroom
/// is `BYTE_BUFFER_CAPACITY - offset - len`, and
/// `headroom + len + tailroom == BYTE_BUFFER_CAPACITY` always holds.
///
/// A buffer is owned by exactly one logical owner at a time. It carries no
/// internal synchronization; transfer ownership by moving it (or its pool
/// handle) between stages.
pub struct ByteBuffer {
    data: [u8; BYTE_BUFFER_CAPACITY],
    offset: usize,
    len: usize,

    /// Sequence number and latency stamp, carried with the payload.
    pub meta: BufferMeta,
}

impl ByteBuffer {
    /// Largest payload a buffer constructed with the default headroom can
    /// hold.
    pub const MAX_PAYLOAD: usize = BYTE_BUFFER_CAPACITY - HEADER_OFFSET;

    /// Create an empty buffer with the default headroom reserved.
    pub fn new() -> Self {
        Self {
            data: [0; BYTE_BUFFER_CAPACITY],
            offset: HEADER_OFFSET,
            len: 0,
            meta: BufferMeta::default(),
        }
    }

    /// Create a buffer whose payload length is already `len`.
    ///
    /// The payload content starts out zeroed. Panics if `len` exceeds
    /// [`ByteBuffer::MAX_PAYLOAD`]; a caller asking for more than the fixed
    /// backing size is a contract violation, never silently truncated.
    pub fn with_len(len: usize) -> Self {
        assert!(
            len <= Self::MAX_PAYLOAD,
            "payload length {} exceeds buffer capacity {}",
            len,
            Self::MAX_PAYLOAD
        );
        let mut buf = Self::new();
        buf.len = len;
        buf
    }

    /// Create a buffer of length `len` with every payload byte set to
    /// `value`. Panics like [`ByteBuffer::with_len`] when `len` does not fit.
    pub fn with_fill(len: usize, value: u8) -> Self {
        let mut buf = Self::with_len(len);
        buf.data_mut().fill(value);
        buf
    }

    /// Reset to an empty buffer: payload start back at the default headroom,
    /// length zero, metadata defaulted. The backing storage is not scrubbed;
    /// consumers must never read past `len()`.
    pub fn clear(&mut self) {
        self.offset = HEADER_OFFSET;
        self.len = 0;
        self.meta = BufferMeta::default();
    }

    /// Unused bytes in front of the payload, available for prepending.
    #[inline]
    pub fn headroom(&self) -> usize {
        self.offset
    }

    /// Unused bytes behind the payload, available for appending.
    #[inline]
    pub fn tailroom(&self) -> usize {
        BYTE_BUFFER_CAPACITY - self.offset - self.len
    }

    /// Number of valid payload bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no payload.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The valid payload region. Never exposes headroom or tailroom bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[self.offset..self.offset + self.len]
    }

    /// Mutable view of the valid payload region.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        let end = self.offset + self.len;
        &mut self.data[self.offset..end]
    }

    /// Iterate over the valid payload bytes.
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.data().iter()
    }

    /// Copy the payload into a reference-counted [`Bytes`] for handoff to
    /// code that outlives this buffer.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.data())
    }

    /// Copy `src` to the end of the payload and extend the length.
    ///
    /// Panics when `src` exceeds the tailroom: overflowing the fixed backing
    /// store is a contract violation, and clamping would corrupt the payload
    /// length undetected. Use [`ByteBuffer::try_append`] where the caller
    /// wants to recover instead.
    pub fn append(&mut self, src: &[u8]) {
        if let Err(e) = self.try_append(src) {
            panic!("byte buffer append: {}", e);
        }
    }

    /// Checked variant of [`ByteBuffer::append`].
    pub fn try_append(&mut self, src: &[u8]) -> Result<()> {
        if src.len() > self.tailroom() {
            return Err(Error::CapacityExceeded {
                requested: src.len(),
                available: self.tailroom(),
            });
        }
        let start = self.offset + self.len;
        self.data[start..start + src.len()].copy_from_slice(src);
        self.len += src.len();
        Ok(())
    }

    /// Copy `src` immediately before the payload start, moving the start
    /// back into the headroom. Panics when `src` exceeds the headroom.
    pub fn prepend(&mut self, src: &[u8]) {
        if let Err(e) = self.try_prepend(src) {
            panic!("byte buffer prepend: {}", e);
        }
    }

    /// Checked variant of [`ByteBuffer::prepend`].
    pub fn try_prepend(&mut self, src: &[u8]) -> Result<()> {
        if src.len() > self.headroom() {
            return Err(Error::CapacityExceeded {
                requested: src.len(),
                available: self.headroom(),
            });
        }
        self.offset -= src.len();
        self.len += src.len();
        self.data[self.offset..self.offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    /// Record the current instant as the buffer's production time.
    #[inline]
    pub fn set_timestamp(&mut self) {
        self.meta.latency.set();
    }

    /// Record an explicit production time.
    #[inline]
    pub fn set_timestamp_at(&mut self, at: Instant) {
        self.meta.latency.set_at(at);
    }

    /// The recorded production time, if any.
    #[inline]
    pub fn timestamp(&self) -> Option<Instant> {
        self.meta.latency.timestamp()
    }

    /// Microseconds elapsed since the buffer was produced, or zero when no
    /// timestamp was ever set.
    #[inline]
    pub fn latency_us(&self) -> u64 {
        self.meta.latency.elapsed_us()
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy of the valid payload only. The destination payload starts at
/// the default headroom regardless of where the source payload sat, and the
/// metadata (including the latency stamp) is copied verbatim: the copy
/// reports latency from the source's production time, not from the copy.
impl Clone for ByteBuffer {
    fn clone(&self) -> Self {
        let mut buf = Self::new();
        buf.clone_from(self);
        buf
    }

    fn clone_from(&mut self, source: &Self) {
        // A payload that grew into the source's headroom can be longer than
        // the room behind the default offset; re-base only as far as fits.
        self.offset = HEADER_OFFSET.min(BYTE_BUFFER_CAPACITY - source.len);
        self.len = source.len;
        self.meta = source.meta;
        self.data[self.offset..self.offset + source.len].copy_from_slice(source.data());
    }
}

/// Equality over the valid payload bytes; headroom position and metadata do
/// not participate.
impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data() == other.data()
    }
}

impl Eq for ByteBuffer {}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl<'a> IntoIterator for &'a ByteBuffer {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Keeps the 12 KiB backing array out of debug output.
impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("len", &self.len)
            .field("headroom", &self.offset)
            .field("tailroom", &self.tailroom())
            .field("seq", &self.meta.seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty_with_default_headroom() {
        let buf = ByteBuffer::new();
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert_eq!(buf.headroom(), HEADER_OFFSET);
        assert_eq!(buf.tailroom(), BYTE_BUFFER_CAPACITY - HEADER_OFFSET);
    }

    #[test]
    fn test_room_accounting_is_conserved() {
        let mut buf = ByteBuffer::new();
        assert_eq!(
            buf.headroom() + buf.len() + buf.tailroom(),
            BYTE_BUFFER_CAPACITY
        );

        buf.append(&[0xAB; 100]);
        buf.prepend(&[0xCD; 8]);
        assert_eq!(
            buf.headroom() + buf.len() + buf.tailroom(),
            BYTE_BUFFER_CAPACITY
        );
    }

    #[test]
    fn test_with_fill() {
        let buf = ByteBuffer::with_fill(10, 0xFF);
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.headroom(), HEADER_OFFSET);
        assert!(buf.data().iter().all(|&b| b == 0xFF));
    }

    #[test]
    #[should_panic(expected = "exceeds buffer capacity")]
    fn test_with_len_over_capacity_panics() {
        let _ = ByteBuffer::with_len(ByteBuffer::MAX_PAYLOAD + 1);
    }

    #[test]
    fn test_append_extends_payload() {
        let mut buf = ByteBuffer::new();
        buf.append(&[1, 2, 3]);
        buf.append(&[4, 5]);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.data(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_append_suffix_matches_input() {
        let mut buf = ByteBuffer::with_fill(4, 0x11);
        buf.append(&[9, 8, 7]);
        assert_eq!(buf.len(), 7);
        assert_eq!(&buf.data()[4..], &[9, 8, 7]);
    }

    #[test]
    fn test_try_append_over_tailroom_is_rejected() {
        let mut buf = ByteBuffer::with_len(ByteBuffer::MAX_PAYLOAD);
        let err = buf.try_append(&[0]).unwrap_err();
        match err {
            Error::CapacityExceeded {
                requested,
                available,
            } => {
                assert_eq!(requested, 1);
                assert_eq!(available, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // A rejected append must leave the buffer untouched.
        assert_eq!(buf.len(), ByteBuffer::MAX_PAYLOAD);
    }

    #[test]
    #[should_panic(expected = "byte buffer append")]
    fn test_append_over_tailroom_panics() {
        let mut buf = ByteBuffer::with_len(ByteBuffer::MAX_PAYLOAD);
        buf.append(&[0]);
    }

    #[test]
    fn test_prepend_places_bytes_before_payload() {
        let mut buf = ByteBuffer::new();
        buf.append(&[10, 11]);
        buf.prepend(&[1, 2, 3]);
        assert_eq!(buf.data(), &[1, 2, 3, 10, 11]);
        assert_eq!(buf.headroom(), HEADER_OFFSET - 3);
    }

    #[test]
    fn test_try_prepend_over_headroom_is_rejected() {
        let mut buf = ByteBuffer::new();
        let big = vec![0u8; HEADER_OFFSET + 1];
        assert!(buf.try_prepend(&big).is_err());
        assert_eq!(buf.headroom(), HEADER_OFFSET);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_clear_resets_bookkeeping() {
        let mut buf = ByteBuffer::with_fill(32, 0xEE);
        buf.prepend(&[1]);
        buf.meta.seq = 77;
        buf.set_timestamp();

        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.headroom(), HEADER_OFFSET);
        assert_eq!(buf.meta.seq, 0);
        assert_eq!(buf.latency_us(), 0);
    }

    #[test]
    fn test_clone_copies_payload_and_metadata() {
        let mut buf = ByteBuffer::new();
        buf.append(&[5, 6, 7, 8]);
        buf.prepend(&[4]);
        buf.meta.seq = 42;
        buf.set_timestamp();

        let copy = buf.clone();
        assert_eq!(copy.len(), buf.len());
        assert_eq!(copy.data(), buf.data());
        assert_eq!(copy.meta.seq, 42);
        assert_eq!(copy.timestamp(), buf.timestamp());
        // The copy starts at the default headroom even though the source
        // payload had moved into its headroom.
        assert_eq!(copy.headroom(), HEADER_OFFSET);
    }

    #[test]
    fn test_clone_from_overwrites_destination() {
        let mut src = ByteBuffer::new();
        src.append(&[1, 2, 3]);
        src.meta.seq = 9;

        let mut dst = ByteBuffer::with_fill(100, 0xAA);
        dst.clone_from(&src);
        assert_eq!(dst.data(), &[1, 2, 3]);
        assert_eq!(dst.meta.seq, 9);
        assert_eq!(dst.headroom(), HEADER_OFFSET);
    }

    #[test]
    fn test_clone_of_oversized_payload_keeps_every_byte() {
        // Grow the payload into the headroom until it no longer fits behind
        // the default offset, then copy.
        let mut buf = ByteBuffer::with_fill(ByteBuffer::MAX_PAYLOAD, 0x01);
        buf.prepend(&[0x02; 100]);
        assert!(buf.len() > ByteBuffer::MAX_PAYLOAD);

        let copy = buf.clone();
        assert_eq!(copy.len(), buf.len());
        assert_eq!(copy.data(), buf.data());
        assert_eq!(copy.headroom(), HEADER_OFFSET - 100);
    }

    #[test]
    fn test_data_mut_writes_are_visible() {
        let mut buf = ByteBuffer::with_len(4);
        buf.data_mut().copy_from_slice(&[9, 9, 9, 9]);
        assert_eq!(buf.data(), &[9, 9, 9, 9]);
    }

    #[test]
    fn test_to_bytes_detaches_payload() {
        let mut buf = ByteBuffer::new();
        buf.append(b"pdu");
        let detached = buf.to_bytes();
        buf.clear();
        assert_eq!(detached.as_ref(), b"pdu");
    }

    #[test]
    fn test_latency_zero_until_set() {
        let buf = ByteBuffer::new();
        assert_eq!(buf.latency_us(), 0);
        assert!(buf.timestamp().is_none());
    }

    #[cfg(feature = "timestamps")]
    #[test]
    fn test_latency_non_decreasing_after_set() {
        let mut buf = ByteBuffer::new();
        buf.set_timestamp();
        let first = buf.latency_us();
        let second = buf.latency_us();
        assert!(second >= first);
    }

    #[test]
    fn test_payload_equality_ignores_headroom() {
        let mut a = ByteBuffer::new();
        a.append(&[1, 2, 3]);

        let mut b = ByteBuffer::new();
        b.append(&[2, 3]);
        b.prepend(&[1]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_iteration_covers_payload_only() {
        let mut buf = ByteBuffer::new();
        buf.append(&[7, 8, 9]);
        let collected: Vec<u8> = buf.iter().copied().collect();
        assert_eq!(collected, vec![7, 8, 9]);
    }
}
