//! Byte transport to the W5100.
//!
//! The driver never touches the host's SPI peripheral directly. Instead the
//! host supplies a [`Transport`]: four operations that select the chip,
//! clock one byte each way, deselect it, and optionally pulse the hardware
//! reset line. Everything above this module is target-independent.
//!
//! [`spi::SpiTransport`] builds a `Transport` from `embedded-hal` parts.

pub mod spi;

pub use spi::{NoReset, ResetLine, ResetPin, SpiTransport};

/// Chip-select / exchange capability supplied by the host.
///
/// A transaction is always `begin`, one or more `exchange` calls, `end`.
/// Implementations are infallible from the driver's point of view: a bus
/// that cannot complete an exchange should return a neutral byte (0x00).
pub trait Transport {
    /// Assert chip-select.
    fn begin(&mut self);

    /// Clock `byte` out and return the byte clocked in.
    fn exchange(&mut self, byte: u8) -> u8;

    /// Release chip-select.
    fn end(&mut self);

    /// Pulse the hardware reset line.
    ///
    /// Returns `false` when the host has no reset line; initialization then
    /// falls back to a software reset through the mode register.
    fn reset(&mut self) -> bool {
        false
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    #[inline]
    fn begin(&mut self) {
        (**self).begin()
    }

    #[inline]
    fn exchange(&mut self, byte: u8) -> u8 {
        (**self).exchange(byte)
    }

    #[inline]
    fn end(&mut self) {
        (**self).end()
    }

    #[inline]
    fn reset(&mut self) -> bool {
        (**self).reset()
    }
}
