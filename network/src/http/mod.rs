//! Application hook for established connections.
//!
//! The dispatch loop hands each request it reads to a [`Responder`] and
//! sends back whatever the responder writes. The crate does not parse HTTP;
//! [`StaticPage`] just answers every request with the same bytes.

pub mod response;

pub use response::{Responder, StaticPage, HELLO_PAGE};
