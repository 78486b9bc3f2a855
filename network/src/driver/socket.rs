//! Socket handles and per-socket register addressing.

use core::fmt;

use crate::device::registers::{self as regs, NUM_SOCKETS};

use super::error::SocketError;
use super::ring::RingBuffer;

/// Index of one of the W5100's hardware sockets.
///
/// A handle carries no state; everything about the socket lives in the
/// chip. Handles are not range-checked on construction, the driver checks
/// them on every call before any register is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketHandle(u8);

impl SocketHandle {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 < NUM_SOCKETS
    }

    /// All hardware sockets.
    pub fn all() -> impl Iterator<Item = SocketHandle> {
        (0..NUM_SOCKETS).map(SocketHandle)
    }

    /// Register addresses for this socket, or `InvalidSocket`.
    pub fn block(self) -> Result<SocketBlock, SocketError> {
        if self.is_valid() {
            Ok(SocketBlock::new(self.0))
        } else {
            Err(SocketError::InvalidSocket(self.0))
        }
    }
}

impl fmt::Display for SocketHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Resolved register addresses of a valid socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketBlock {
    base: u16,
    tx: RingBuffer,
    rx: RingBuffer,
}

impl SocketBlock {
    const fn new(index: u8) -> Self {
        Self {
            base: regs::socket_base(index),
            tx: RingBuffer::tx(index),
            rx: RingBuffer::rx(index),
        }
    }

    pub const fn mode(&self) -> u16 {
        self.base + regs::SN_MR
    }

    pub const fn command(&self) -> u16 {
        self.base + regs::SN_CR
    }

    pub const fn status(&self) -> u16 {
        self.base + regs::SN_SR
    }

    pub const fn port(&self) -> u16 {
        self.base + regs::SN_PORT
    }

    pub const fn tx_free_size(&self) -> u16 {
        self.base + regs::SN_TX_FSR
    }

    pub const fn tx_write_ptr(&self) -> u16 {
        self.base + regs::SN_TX_WR
    }

    pub const fn rx_received_size(&self) -> u16 {
        self.base + regs::SN_RX_RSR
    }

    pub const fn rx_read_ptr(&self) -> u16 {
        self.base + regs::SN_RX_RD
    }

    pub const fn tx_ring(&self) -> RingBuffer {
        self.tx
    }

    pub const fn rx_ring(&self) -> RingBuffer {
        self.rx
    }
}
