//! Socket TX/RX buffer windows.
//!
//! Each socket owns a 2 KiB window of TX memory and one of RX memory. The
//! chip's read/write pointers are free-running 16-bit counters; the low
//! bits, masked by the window size, give the offset inside the window.

use crate::device::registers::{BUF_MASK, BUF_WINDOW_SIZE, RX_BUF_BASE, TX_BUF_BASE};

/// One socket's circular buffer in W5100 memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingBuffer {
    base: u16,
    mask: u16,
}

impl RingBuffer {
    /// `mask` must be `size - 1` for a power-of-two `size`.
    pub const fn new(base: u16, mask: u16) -> Self {
        Self { base, mask }
    }

    /// TX window of socket `index`.
    pub const fn tx(index: u8) -> Self {
        Self::new(TX_BUF_BASE + (index as u16) * BUF_WINDOW_SIZE, BUF_MASK)
    }

    /// RX window of socket `index`.
    pub const fn rx(index: u8) -> Self {
        Self::new(RX_BUF_BASE + (index as u16) * BUF_WINDOW_SIZE, BUF_MASK)
    }

    pub const fn base(&self) -> u16 {
        self.base
    }

    pub const fn capacity(&self) -> usize {
        self.mask as usize + 1
    }

    /// Chip address of logical pointer value `offset`.
    #[inline]
    pub const fn physical(&self, offset: u16) -> u16 {
        self.base + (offset & self.mask)
    }
}
