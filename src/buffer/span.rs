//! Non-owning views over a buffer's valid payload.
//!
//! A span is a plain slice taken over exactly the payload region, for code
//! that must read or write payload bytes without owning or copying the
//! buffer. Its length is frozen at creation and does not track later
//! appends; its validity window is the borrow of the source buffer, which
//! the borrow checker enforces at compile time.

use crate::buffer::ByteBuffer;

/// Read access to a buffer's valid payload, implemented by buffers and by
/// owning handles that dereference to one.
pub trait Payload {
    /// The valid payload bytes.
    fn payload(&self) -> &[u8];
}

/// Write access to a buffer's valid payload. Writes stay within the payload
/// region; no bounds growth is possible through the view.
pub trait PayloadMut: Payload {
    /// Mutable view of the valid payload bytes.
    fn payload_mut(&mut self) -> &mut [u8];
}

impl Payload for ByteBuffer {
    #[inline]
    fn payload(&self) -> &[u8] {
        self.data()
    }
}

impl PayloadMut for ByteBuffer {
    #[inline]
    fn payload_mut(&mut self) -> &mut [u8] {
        self.data_mut()
    }
}

/// Read-only span over the valid payload of `buf`.
#[inline]
pub fn make_span<B: Payload + ?Sized>(buf: &B) -> &[u8] {
    buf.payload()
}

/// Mutable span over the valid payload of `buf`.
#[inline]
pub fn make_span_mut<B: PayloadMut + ?Sized>(buf: &mut B) -> &mut [u8] {
    buf.payload_mut()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_covers_exact_payload() {
        let mut buf = ByteBuffer::new();
        buf.append(&[1, 2, 3, 4]);

        let span = make_span(&buf);
        assert_eq!(span.len(), 4);
        assert_eq!(span, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_span_length_frozen_at_creation() {
        let mut buf = ByteBuffer::new();
        buf.append(&[1, 2]);

        let snapshot: Vec<u8> = make_span(&buf).to_vec();
        buf.append(&[3]);

        // The earlier view reflects the payload at creation time only.
        assert_eq!(snapshot, vec![1, 2]);
        assert_eq!(make_span(&buf), &[1, 2, 3]);
    }

    #[test]
    fn test_mutable_span_writes_through() {
        let mut buf = ByteBuffer::with_len(3);
        make_span_mut(&mut buf).copy_from_slice(&[7, 7, 7]);
        assert_eq!(buf.data(), &[7, 7, 7]);
    }

    #[test]
    fn test_span_over_empty_buffer() {
        let buf = ByteBuffer::new();
        assert!(make_span(&buf).is_empty());
    }
}
