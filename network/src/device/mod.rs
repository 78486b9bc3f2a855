//! W5100 device description.
//!
//! Register map and the one-time common register setup. Per-socket
//! operations live in [`crate::driver`].

pub mod config;
pub mod registers;

pub use config::{configure, NetworkConfig};
