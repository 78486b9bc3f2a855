//! Server orchestrator.
//!
//! # Entry Point Contract
//!
//! **SOLE ENTRY**: `serve()`, or a [`Dispatcher`] driven by the host.
//!
//! **PRECONDITIONS** (caller must ensure):
//! 1. Host peripherals (SPI, chip-select, reset pin, timer) are brought up
//! 2. The transport is wired into the driver's register access
//!
//! **WHAT `serve()` DOES**:
//! - Resets and configures the chip
//! - Prints a banner to the console and mirrors the ring logger onto it
//! - Polls every slot forever
//!
//! # Flow (per slot, per pass)
//! ```text
//! Closed → Open+Listen │ Established → Receive → respond → Send → Disconnect
//! teardown → Close     │ anything else → idle
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::device::NetworkConfig;
use crate::driver::{RegisterAccess, SocketError, SocketHandle, W5100Driver};
use crate::http::Responder;

use super::serial;
use super::slot::SocketSlot;
use super::state::StepResult;

/// Running totals across passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub passes: u64,
    pub listens: u32,
    pub served: u32,
    pub recycled: u32,
    pub failures: u32,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub last_error: Option<SocketError>,
}

impl DispatchStats {
    fn record(&mut self, handle: SocketHandle, result: &StepResult) {
        if result.is_failure() {
            self.failures += 1;
        }
        match *result {
            StepResult::Idle => {}
            StepResult::Listening => {
                self.listens += 1;
                debug!("{}: {}", handle, result.name());
            }
            StepResult::Served { received, sent } => {
                self.served += 1;
                self.bytes_in += received as u64;
                self.bytes_out += sent as u64;
                info!("{}: served {} byte request with {} bytes", handle, received, sent);
            }
            StepResult::Recycled => {
                self.recycled += 1;
                debug!("{}: {} after teardown", handle, result.name());
            }
            StepResult::Failed(e) => {
                self.last_error = Some(e);
                warn!("{}: {}: {}", handle, result.name(), e);
            }
        }
    }
}

/// Drives an array of socket slots over one controller.
pub struct Dispatcher<R, D, P, const N: usize> {
    driver: W5100Driver<R, D>,
    slots: [SocketSlot; N],
    responder: P,
    stats: DispatchStats,
}

impl<R, D, P, const N: usize> Dispatcher<R, D, P, N>
where
    R: RegisterAccess,
    D: DelayNs,
    P: Responder,
{
    pub fn new(driver: W5100Driver<R, D>, slots: [SocketSlot; N], responder: P) -> Self {
        Self {
            driver,
            slots,
            responder,
            stats: DispatchStats::default(),
        }
    }

    /// Step every slot once, in order.
    pub fn poll_once(&mut self) -> [StepResult; N] {
        let Self {
            driver,
            slots,
            responder,
            stats,
        } = self;

        let results = core::array::from_fn(|i| {
            let result = slots[i].step(&mut *driver, &mut *responder);
            stats.record(slots[i].handle(), &result);
            result
        });
        stats.passes += 1;
        results
    }

    /// Poll forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.poll_once();
        }
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    pub fn slots(&self) -> &[SocketSlot; N] {
        &self.slots
    }

    pub fn driver(&self) -> &W5100Driver<R, D> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut W5100Driver<R, D> {
        &mut self.driver
    }

    pub fn into_parts(self) -> (W5100Driver<R, D>, [SocketSlot; N], P) {
        (self.driver, self.slots, self.responder)
    }
}

/// Reset and configure the chip, then serve connections forever.
pub fn serve<R, D, P, const N: usize>(
    mut driver: W5100Driver<R, D>,
    config: &NetworkConfig,
    slots: [SocketSlot; N],
    responder: P,
) -> !
where
    R: RegisterAccess,
    D: DelayNs,
    P: Responder,
{
    driver.init();
    driver.configure(config);
    print_banner(config, &slots);
    serial::attach_to_log();

    Dispatcher::new(driver, slots, responder).run()
}

fn print_banner(config: &NetworkConfig, slots: &[SocketSlot]) {
    serial::println("=====================================");
    serial::println("  W5100 socket server");
    serial::println("=====================================");
    serial::print("  MAC:     ");
    serial::print_mac(&config.mac.0);
    serial::println("");
    serial::print("  IP:      ");
    serial::print_ipv4(&config.ip.0);
    serial::println("");
    serial::print("  Mask:    ");
    serial::print_ipv4(&config.subnet.0);
    serial::println("");
    serial::print("  Gateway: ");
    serial::print_ipv4(&config.gateway.0);
    serial::println("");
    serial::print("  Sockets: ");
    serial::print_u32(slots.len() as u32);
    if let Some(first) = slots.first() {
        serial::print(" on port ");
        serial::print_u32(first.port() as u32);
    }
    serial::println("");
}
