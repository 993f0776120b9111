//! Fixed-length response accumulation.
//!
//! The protocol has no length prefix or delimiter in either direction: the
//! device answers a command with a fixed number of bytes, and the host
//! already knows how many to expect. The accumulator buffers whatever the
//! channel delivers — a serial line is free to hand back one byte at a
//! time — until the expected count is reached.

use bytes::{Buf, BytesMut};

/// Accumulates channel reads until a fixed-length response is complete.
#[derive(Debug)]
pub struct ResponseAccumulator {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
    /// Number of bytes the complete response occupies.
    expected: usize,
}

impl ResponseAccumulator {
    /// Create an accumulator for a response of `expected` bytes.
    pub fn new(expected: usize) -> Self {
        ResponseAccumulator {
            buffer: BytesMut::with_capacity(expected),
            expected,
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        log::trace!(
            "accumulated {} byte(s), {}/{} buffered",
            data.len(),
            self.buffer.len() + data.len(),
            self.expected
        );
        self.buffer.extend_from_slice(data);
    }

    /// Whether the complete response has been buffered.
    pub fn is_complete(&self) -> bool {
        self.buffer.len() >= self.expected
    }

    /// Number of bytes still missing.
    pub fn remaining(&self) -> usize {
        self.expected.saturating_sub(self.buffer.len())
    }

    /// Try to take the complete response out of the buffer.
    ///
    /// Returns `Some(response)` of exactly the expected length once enough
    /// data has arrived, or `None` if more is needed. Any excess bytes stay
    /// buffered.
    pub fn take(&mut self) -> Option<Vec<u8>> {
        if self.buffer.len() < self.expected {
            return None;
        }

        let response = self.buffer.copy_to_bytes(self.expected).to_vec();
        Some(response)
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_exact() {
        let mut acc = ResponseAccumulator::new(4);

        acc.push(&[1, 2, 3, 4]);
        assert!(acc.is_complete());
        assert_eq!(acc.take(), Some(vec![1, 2, 3, 4]));
        assert_eq!(acc.buffered_len(), 0);
    }

    #[test]
    fn test_accumulate_partial() {
        let mut acc = ResponseAccumulator::new(4);

        // One byte at a time, as a serial line may deliver.
        acc.push(&[1]);
        assert!(!acc.is_complete());
        assert_eq!(acc.remaining(), 3);
        assert!(acc.take().is_none());

        acc.push(&[2, 3]);
        assert!(acc.take().is_none());

        acc.push(&[4]);
        assert_eq!(acc.take(), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn test_excess_stays_buffered() {
        let mut acc = ResponseAccumulator::new(2);

        acc.push(&[1, 2, 3]);
        assert_eq!(acc.take(), Some(vec![1, 2]));
        assert_eq!(acc.buffered_len(), 1);
    }

    #[test]
    fn test_never_returns_short() {
        let mut acc = ResponseAccumulator::new(512);

        acc.push(&[0u8; 256]);
        assert!(!acc.is_complete());
        assert_eq!(acc.remaining(), 256);
        assert!(acc.take().is_none());
    }
}
