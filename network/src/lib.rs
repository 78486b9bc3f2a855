//! Socket driver for the WIZnet W5100 hardwired TCP/IP chip.
//!
//! The W5100 runs TCP, UDP and IP in silicon and exposes four hardware
//! sockets through a register file reached over SPI. This crate drives
//! those sockets from a polled, single-threaded host.
//!
//! # Architecture
//! - `transport` - SPI chip-select/exchange/reset over `embedded-hal`
//! - `driver` - register framing, socket lifecycle, TX/RX ring transfers
//! - `device` - register map and common network configuration
//! - `time` - poll budgets and settle delays
//! - `http` - response hook for established connections
//! - `mainloop` - per-socket dispatch loop and console output
//!
//! # Usage
//! ```ignore
//! let transport = SpiTransport::new(spi, cs).with_reset(rst, reset_delay);
//! let driver = W5100Driver::new(RegisterBus::new(transport), delay, Timeouts::default());
//! let slots: [SocketSlot; 4] = SocketSlot::all(HTTP_PORT);
//! serve(driver, &NetworkConfig::default(), slots, StaticPage::default());
//! ```

#![cfg_attr(not(test), no_std)]

pub mod device;
pub mod driver;
pub mod http;
pub mod mainloop;
pub mod time;
pub mod transport;

pub use device::NetworkConfig;
pub use driver::{
    Command, Protocol, RegisterAccess, RegisterBus, SharedBus, SocketError, SocketHandle,
    SocketStatus, W5100Driver,
};
pub use http::{Responder, StaticPage};
pub use mainloop::{serve, Dispatcher, SocketSlot, StepResult, HTTP_PORT};
pub use time::Timeouts;
pub use transport::{SpiTransport, Transport};
