//! W5100 socket driver.
//!
//! # Layers
//!
//! - [`bus`]: register reads/writes framed over a [`crate::transport::Transport`]
//! - [`socket`], [`ring`]: per-socket register block and buffer windows
//! - [`w5100`]: socket lifecycle and data path on top of the bus
//!
//! Nothing here allocates; all state that matters lives in the chip.

pub mod bus;
pub mod error;
pub mod ring;
pub mod socket;
pub mod status;
pub mod w5100;

#[cfg(test)]
pub(crate) mod sim;

pub use bus::{RegisterAccess, RegisterBus, SharedBus};
pub use error::SocketError;
pub use ring::RingBuffer;
pub use socket::{SocketBlock, SocketHandle};
pub use status::{Command, Protocol, SocketStatus};
pub use w5100::W5100Driver;
