//! `embedded-hal` backed transport.
//!
//! Wraps an [`SpiBus`], a chip-select [`OutputPin`] and an optional reset
//! pin. The W5100 samples on SPI mode 0 and needs CS held low for the whole
//! 4-byte frame, so chip-select is driven manually rather than through an
//! `SpiDevice`.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::spi::{Error as _, SpiBus};

use super::Transport;

/// Low time of the reset pulse (datasheet minimum is 2 µs).
pub const RESET_PULSE_MS: u32 = 5;

/// Wake-up time after releasing reset.
pub const RESET_WAKE_MS: u32 = 10;

/// Hardware reset strategy for [`SpiTransport`].
pub trait ResetLine {
    /// Pulse reset. Returns `false` if there is no line to pulse.
    fn pulse(&mut self) -> bool;
}

/// No reset line wired; the driver falls back to a software reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReset;

impl ResetLine for NoReset {
    fn pulse(&mut self) -> bool {
        false
    }
}

/// Active-low reset pin plus the delay used to time the pulse.
pub struct ResetPin<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> ResetLine for ResetPin<P, D> {
    fn pulse(&mut self) -> bool {
        // Pin may still be floating from bring-up
        drive(&mut self.pin, true);
        drive(&mut self.pin, false);
        self.delay.delay_ms(RESET_PULSE_MS);
        drive(&mut self.pin, true);
        self.delay.delay_ms(RESET_WAKE_MS);
        true
    }
}

/// [`Transport`] over `embedded-hal` SPI and GPIO.
pub struct SpiTransport<SPI, CS, R = NoReset> {
    spi: SPI,
    cs: CS,
    reset: R,
}

impl<SPI, CS> SpiTransport<SPI, CS, NoReset>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Create a transport without a reset line.
    ///
    /// Chip-select is driven high (idle) immediately.
    pub fn new(spi: SPI, mut cs: CS) -> Self {
        drive(&mut cs, true);
        Self {
            spi,
            cs,
            reset: NoReset,
        }
    }

    /// Attach an active-low reset pin.
    pub fn with_reset<P, D>(self, pin: P, delay: D) -> SpiTransport<SPI, CS, ResetPin<P, D>>
    where
        P: OutputPin,
        D: DelayNs,
    {
        SpiTransport {
            spi: self.spi,
            cs: self.cs,
            reset: ResetPin { pin, delay },
        }
    }
}

impl<SPI, CS, R> SpiTransport<SPI, CS, R> {
    /// Give back the bus and pins.
    pub fn release(self) -> (SPI, CS, R) {
        (self.spi, self.cs, self.reset)
    }
}

impl<SPI, CS, R> Transport for SpiTransport<SPI, CS, R>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    R: ResetLine,
{
    fn begin(&mut self) {
        drive(&mut self.cs, false);
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        let mut buf = [byte];
        match self.spi.transfer_in_place(&mut buf) {
            Ok(()) => buf[0],
            Err(e) => {
                log::warn!("spi exchange failed: {:?}", e.kind());
                0x00
            }
        }
    }

    fn end(&mut self) {
        if let Err(e) = self.spi.flush() {
            log::warn!("spi flush failed: {:?}", e.kind());
        }
        drive(&mut self.cs, true);
    }

    fn reset(&mut self) -> bool {
        self.reset.pulse()
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        log::warn!("gpio write failed: {:?}", e.kind());
    }
}
