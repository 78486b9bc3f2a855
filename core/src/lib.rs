//! Shared support code for the ethershield crates.
//!
//! Currently this is the log backend: driver crates emit records through the
//! `log` facade and `logger::RingLogger` keeps the most recent ones in a
//! fixed ring so they can be dumped over the console after the fact.

#![cfg_attr(not(test), no_std)]

pub mod logger;

pub use logger::{init, LogEntry, RingLogger, LOGGER, MAX_LINE_LEN, MAX_LOG_ENTRIES};
