//! Outcome of one pass over a socket slot.

use crate::driver::SocketError;

/// What a slot did during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Nothing to do: listening, handshaking, or no data yet.
    Idle,
    /// Socket was Closed and is now listening again.
    Listening,
    /// One request read and answered; the socket is disconnecting.
    Served { received: usize, sent: usize },
    /// A teardown state was closed.
    Recycled,
    /// An operation failed. The slot retries once the socket reads Closed.
    Failed(SocketError),
}

impl StepResult {
    pub const fn name(&self) -> &'static str {
        match self {
            StepResult::Idle => "idle",
            StepResult::Listening => "listening",
            StepResult::Served { .. } => "served",
            StepResult::Recycled => "recycled",
            StepResult::Failed(_) => "failed",
        }
    }

    pub const fn is_failure(&self) -> bool {
        matches!(self, StepResult::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_failure() {
        let failed = StepResult::Failed(SocketError::ZeroLength);
        let served = StepResult::Served { received: 37, sent: 120 };

        assert_eq!(failed.name(), "failed");
        assert_eq!(served.name(), "served");
        assert_eq!(StepResult::Idle.name(), "idle");
        assert!(failed.is_failure());
        assert!(!served.is_failure());
        assert!(!StepResult::Recycled.is_failure());
    }
}
