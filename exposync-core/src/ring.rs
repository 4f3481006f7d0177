//! Fixed-capacity byte ring buffer
//!
//! Used for the receiver RX path (interrupt writes, main loop reads) and the
//! TX path (main loop writes, transmit-ready context drains). The buffer
//! itself is not synchronized; [`crate::DeviceContext`] wraps each one in a
//! critical-section mutex so a push or pop is atomic with respect to the
//! other side.
//!
//! Cursors are free-running counters. Slots are addressed with an explicit
//! power-of-two mask, so wraparound never depends on the width of the
//! cursor type, and all `N` slots are usable.

/// Ring buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingError {
    /// No free slot; unread data is never overwritten
    Full,
}

/// Single-producer/single-consumer byte ring of capacity `N`
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    buf: [u8; N],
    read: usize,
    write: usize,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const MASK: usize = {
        assert!(N.is_power_of_two(), "ring capacity must be a power of two");
        N - 1
    };

    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            read: 0,
            write: 0,
        }
    }

    /// Number of unread bytes
    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read)
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Append a byte
    pub fn push(&mut self, byte: u8) -> Result<(), RingError> {
        if self.is_full() {
            return Err(RingError::Full);
        }
        self.buf[self.write & Self::MASK] = byte;
        self.write = self.write.wrapping_add(1);
        Ok(())
    }

    /// Take the oldest unread byte
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = self.buf[self.read & Self::MASK];
        self.read = self.read.wrapping_add(1);
        Some(byte)
    }

    /// Discard all unread bytes
    pub fn clear(&mut self) {
        self.read = self.write;
    }
}
