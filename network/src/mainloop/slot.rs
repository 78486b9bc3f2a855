//! Per-socket server state machine.
//!
//! ```text
//! Closed ──open+listen──▶ Listen ──peer SYN──▶ Established
//!   ▲                                              │ request
//!   │                                              ▼
//!   └──close── FinWait/Closing/TimeWait/... ◀── respond + disconnect
//! ```
//!
//! The slot keeps no state of its own beyond scratch buffers; each step
//! reads the socket status fresh and acts on it.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::driver::{Protocol, RegisterAccess, SocketHandle, SocketStatus, W5100Driver};
use crate::http::Responder;

use super::state::StepResult;

/// Size of each slot's request and response buffers.
pub const SCRATCH_SIZE: usize = 256;

/// Default listening port.
pub const HTTP_PORT: u16 = 80;

/// Yield after reopening a socket (ms).
pub const LISTEN_SETTLE_MS: u32 = 1;

/// Yield when an established socket has no data yet (µs).
pub const IDLE_POLL_US: u32 = 10;

/// One hardware socket serving connections on a fixed port.
pub struct SocketSlot {
    handle: SocketHandle,
    port: u16,
    rx: [u8; SCRATCH_SIZE],
    tx: [u8; SCRATCH_SIZE],
}

impl SocketSlot {
    pub const fn new(handle: SocketHandle, port: u16) -> Self {
        Self {
            handle,
            port,
            rx: [0; SCRATCH_SIZE],
            tx: [0; SCRATCH_SIZE],
        }
    }

    /// Slots for sockets `0..N`, all on `port`.
    pub fn all<const N: usize>(port: u16) -> [SocketSlot; N] {
        core::array::from_fn(|i| SocketSlot::new(SocketHandle::new(i as u8), port))
    }

    pub const fn handle(&self) -> SocketHandle {
        self.handle
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Run one pass of the state machine.
    pub fn step<R, D, P>(&mut self, driver: &mut W5100Driver<R, D>, responder: &mut P) -> StepResult
    where
        R: RegisterAccess,
        D: DelayNs,
        P: Responder,
    {
        let status = match driver.status(self.handle) {
            Ok(s) => s,
            Err(e) => return StepResult::Failed(e),
        };

        match status {
            SocketStatus::Closed => self.reopen(driver),
            SocketStatus::Established => self.serve(driver, responder),
            s if s.is_teardown() => match driver.close(self.handle) {
                Ok(()) => StepResult::Recycled,
                Err(e) => StepResult::Failed(e),
            },
            _ => StepResult::Idle,
        }
    }

    fn reopen<R: RegisterAccess, D: DelayNs>(&mut self, driver: &mut W5100Driver<R, D>) -> StepResult {
        let handle = match driver.open(self.handle, Protocol::Tcp, self.port) {
            Ok(h) => h,
            Err(e) => return StepResult::Failed(e),
        };
        let listened = driver.listen(handle);
        driver.delay().delay_ms(LISTEN_SETTLE_MS);

        match listened {
            Ok(()) => StepResult::Listening,
            Err(e) => StepResult::Failed(e),
        }
    }

    fn serve<R, D, P>(&mut self, driver: &mut W5100Driver<R, D>, responder: &mut P) -> StepResult
    where
        R: RegisterAccess,
        D: DelayNs,
        P: Responder,
    {
        let pending = driver.received_size(self.handle) as usize;
        if pending == 0 {
            driver.delay().delay_us(IDLE_POLL_US);
            return StepResult::Idle;
        }

        let received = match driver.receive(self.handle, &mut self.rx, pending) {
            Ok(n) => n,
            Err(e) => return StepResult::Failed(e),
        };
        debug!("{}: request of {} bytes", self.handle, received);

        let len = responder
            .respond(&self.rx[..received], &mut self.tx)
            .min(SCRATCH_SIZE);

        let sent = if len > 0 {
            match driver.send(self.handle, &self.tx[..len]) {
                Ok(n) => n,
                Err(e) => return StepResult::Failed(e),
            }
        } else {
            0
        };

        match driver.disconnect(self.handle) {
            Ok(()) => StepResult::Served { received, sent },
            Err(e) => StepResult::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::registers::*;
    use crate::driver::sim::{SimDelay, SimW5100};
    use crate::driver::{RegisterBus, SocketError};
    use crate::http::StaticPage;
    use crate::time::Timeouts;

    type SimDriver = W5100Driver<RegisterBus<SimW5100>, SimDelay>;

    fn driver() -> SimDriver {
        W5100Driver::new(RegisterBus::new(SimW5100::new()), SimDelay::default(), Timeouts::default())
    }

    fn sim(d: &mut SimDriver) -> &mut SimW5100 {
        d.registers_mut().transport_mut()
    }

    #[test]
    fn test_closed_slot_reopens_and_listens() {
        let mut d = driver();
        let mut slot = SocketSlot::new(SocketHandle::new(0), HTTP_PORT);

        assert_eq!(slot.step(&mut d, &mut StaticPage::default()), StepResult::Listening);
        assert_eq!(sim(&mut d).status(0), SR_LISTEN);
        assert_eq!(d.delay().ms_calls, 1);
    }

    #[test]
    fn test_established_without_data_idles() {
        let mut d = driver();
        sim(&mut d).set_status(0, SR_ESTABLISHED);
        let mut slot = SocketSlot::new(SocketHandle::new(0), HTTP_PORT);

        assert_eq!(slot.step(&mut d, &mut StaticPage::default()), StepResult::Idle);
        assert_eq!(d.delay().us_calls, 1);
        assert!(sim(&mut d).commands(0).is_empty());
    }

    #[test]
    fn test_request_is_truncated_to_scratch() {
        let mut d = driver();
        sim(&mut d).set_status(0, SR_ESTABLISHED);
        sim(&mut d).inject_rx(0, &[b'a'; 300]);
        let mut slot = SocketSlot::new(SocketHandle::new(0), HTTP_PORT);

        let mut seen = 0;
        let mut count = |req: &[u8], _out: &mut [u8]| -> usize {
            seen = req.len();
            0
        };
        assert_eq!(
            slot.step(&mut d, &mut count),
            StepResult::Served { received: SCRATCH_SIZE - 1, sent: 0 }
        );
        assert_eq!(seen, SCRATCH_SIZE - 1);
        // Empty response: nothing sent, still disconnected
        assert_eq!(sim(&mut d).commands(0), [CR_RECV, CR_DISCON]);
    }

    #[test]
    fn test_teardown_states_are_closed() {
        for raw in [SR_FIN_WAIT, SR_CLOSING, SR_TIME_WAIT, SR_CLOSE_WAIT, SR_LAST_ACK] {
            let mut d = driver();
            sim(&mut d).set_status(2, raw);
            let mut slot = SocketSlot::new(SocketHandle::new(2), HTTP_PORT);

            assert_eq!(slot.step(&mut d, &mut StaticPage::default()), StepResult::Recycled);
            assert_eq!(sim(&mut d).status(2), SR_CLOSED);
        }
    }

    #[test]
    fn test_other_states_idle() {
        for raw in [SR_LISTEN, SR_SYNRECV, SR_INIT, SR_UDP] {
            let mut d = driver();
            sim(&mut d).set_status(1, raw);
            let mut slot = SocketSlot::new(SocketHandle::new(1), HTTP_PORT);

            assert_eq!(slot.step(&mut d, &mut StaticPage::default()), StepResult::Idle);
            assert!(sim(&mut d).commands(1).is_empty());
        }
    }

    #[test]
    fn test_invalid_slot_fails_without_traffic() {
        let mut d = driver();
        let mut slot = SocketSlot::new(SocketHandle::new(9), HTTP_PORT);

        assert_eq!(
            slot.step(&mut d, &mut StaticPage::default()),
            StepResult::Failed(SocketError::InvalidSocket(9))
        );
        assert_eq!(sim(&mut d).frames, 0);
    }

    #[test]
    fn test_all_builds_consecutive_handles() {
        let slots: [SocketSlot; 4] = SocketSlot::all(8080);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.handle(), SocketHandle::new(i as u8));
            assert_eq!(slot.port(), 8080);
        }
    }
}
