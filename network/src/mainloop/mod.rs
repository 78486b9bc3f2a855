//! Main loop module.
//!
//! Status-driven dispatch over the chip's hardware sockets.
//!
//! # Architecture
//! - `state` - StepResult for one pass over a slot
//! - `slot` - Per-socket state machine and scratch buffers
//! - `serial` - Console output primitives
//! - `orchestrator` - Dispatcher and the `serve` entry point

pub mod orchestrator;
pub mod serial;
pub mod slot;
pub mod state;

pub use orchestrator::{serve, DispatchStats, Dispatcher};
pub use serial::{print, print_hex, print_ipv4, print_mac, print_u32, println};
pub use slot::{SocketSlot, HTTP_PORT, SCRATCH_SIZE};
pub use state::StepResult;
