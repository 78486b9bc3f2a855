//! Socket controller errors.

use core::fmt;

use super::status::{Command, SocketStatus};

/// Failure of a socket operation.
///
/// None of these are fatal: the dispatch loop recovers by waiting for the
/// socket to read back as Closed and starting over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketError {
    /// Socket index outside the chip's range. No register was touched.
    InvalidSocket(u8),
    /// Zero-length send or receive request.
    ZeroLength,
    /// Receive destination cannot hold one byte plus the terminator.
    BufferTooSmall,
    /// Payload can never fit in the socket's TX window.
    TooLarge {
        /// Requested length.
        len: usize,
        /// TX window size.
        max: usize,
    },
    /// Operation not valid in the socket's current state. No command issued.
    InvalidState {
        expected: SocketStatus,
        actual: SocketStatus,
    },
    /// Command was accepted but the socket landed in the wrong state.
    /// The socket has been closed.
    StatusMismatch {
        expected: SocketStatus,
        actual: SocketStatus,
    },
    /// Sn_CR never read back zero.
    CommandTimeout(Command),
    /// TX free size stayed below the payload length. The socket has been
    /// disconnected.
    TxBufferTimeout {
        /// Bytes requested.
        needed: usize,
        /// Free size at the last poll.
        free: u16,
    },
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketError::InvalidSocket(n) => write!(f, "invalid socket {}", n),
            SocketError::ZeroLength => f.write_str("zero-length transfer"),
            SocketError::BufferTooSmall => f.write_str("receive buffer too small"),
            SocketError::TooLarge { len, max } => {
                write!(f, "payload of {} bytes exceeds {} byte TX window", len, max)
            }
            SocketError::InvalidState { expected, actual } => {
                write!(f, "socket is {}, expected {}", actual, expected)
            }
            SocketError::StatusMismatch { expected, actual } => {
                write!(f, "socket went to {} instead of {}", actual, expected)
            }
            SocketError::CommandTimeout(cmd) => write!(f, "{} not acknowledged", cmd),
            SocketError::TxBufferTimeout { needed, free } => {
                write!(f, "TX buffer stuck at {} free, needed {}", free, needed)
            }
        }
    }
}
