//! Timing and retry budgets.
//!
//! The W5100 gives no completion interrupt in polled mode, so every wait in
//! the driver is a poll with a host-supplied `DelayNs` between attempts.
//! These budgets bound all of those waits.

/// Poll budgets and settle delays used by the socket controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Sn_CR reads before a command is declared stuck.
    pub command_ack_polls: u32,
    /// Delay between Sn_CR polls (µs).
    pub command_ack_poll_us: u32,
    /// Sleeps allowed while waiting for TX free space.
    pub send_retries: u32,
    /// Length of each TX free-space sleep (ms).
    pub send_poll_ms: u32,
    /// Settle time after RECV (µs). RECV is not polled for acknowledgment.
    pub recv_settle_us: u32,
    /// Settle time after each group of identity registers (ms).
    pub config_settle_ms: u32,
    /// Settle time after reset (ms).
    pub reset_settle_ms: u32,
}

impl Timeouts {
    /// Defaults for a W5100 on a few-MHz SPI clock.
    pub const fn new() -> Self {
        Self {
            // 10ms worth of 1µs polls
            command_ack_polls: 10_000,
            command_ack_poll_us: 1,
            // About one second in 1ms steps
            send_retries: 1_000,
            send_poll_ms: 1,
            recv_settle_us: 5,
            config_settle_ms: 1,
            reset_settle_ms: 1,
        }
    }

    /// Upper bound on time spent waiting for one command (µs).
    #[inline]
    pub const fn command_ack_budget_us(&self) -> u64 {
        self.command_ack_polls as u64 * self.command_ack_poll_us as u64
    }

    /// Upper bound on time spent waiting for TX space (ms).
    #[inline]
    pub const fn send_budget_ms(&self) -> u64 {
        self.send_retries as u64 * self.send_poll_ms as u64
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_budget_is_about_one_second() {
        assert_eq!(Timeouts::default().send_budget_ms(), 1_000);
    }

    #[test]
    fn test_command_budget() {
        let t = Timeouts {
            command_ack_polls: 50,
            command_ack_poll_us: 2,
            ..Timeouts::new()
        };
        assert_eq!(t.command_ack_budget_us(), 100);
    }
}
