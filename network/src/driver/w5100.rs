//! W5100 socket controller.
//!
//! Socket lifecycle (open, listen, disconnect, close) and the circular-buffer
//! transfers for send and receive, all over a [`RegisterAccess`].
//!
//! Every wait is bounded:
//! - commands poll Sn_CR for zero up to `command_ack_polls` times
//! - send polls Sn_TX_FSR up to `send_retries` times, then disconnects
//! - RECV is not polled, only followed by a short settle delay
//!
//! Out-of-range handles are rejected before any register is touched.
//!
//! # Reference
//! - W5100 Datasheet v1.2.4, Section 4 (Socket Registers)
//! - W5100 Datasheet v1.2.4, Section 5 (Functional Description)

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::device::config::{self, NetworkConfig};
use crate::device::registers::{MR, MR_RST};
use crate::time::Timeouts;

use super::bus::RegisterAccess;
use super::error::SocketError;
use super::socket::{SocketBlock, SocketHandle};
use super::status::{Command, Protocol, SocketStatus};

/// Socket-level driver for one W5100.
pub struct W5100Driver<R, D> {
    regs: R,
    delay: D,
    timeouts: Timeouts,
}

impl<R: RegisterAccess, D: DelayNs> W5100Driver<R, D> {
    pub fn new(regs: R, delay: D, timeouts: Timeouts) -> Self {
        Self {
            regs,
            delay,
            timeouts,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CHIP SETUP
    // ═══════════════════════════════════════════════════════════════════════

    /// Reset the chip.
    ///
    /// Uses the hardware reset line when the transport has one, otherwise
    /// sets MR.RST. Either way all registers return to power-on values.
    pub fn init(&mut self) {
        if self.regs.reset_line() {
            debug!("hardware reset");
        } else {
            debug!("soft reset via MR.RST");
            self.regs.write(MR, MR_RST);
        }
        self.delay.delay_ms(self.timeouts.reset_settle_ms);
    }

    /// Write gateway, MAC, subnet and IP, and split socket memory 2K/2K.
    pub fn configure(&mut self, cfg: &NetworkConfig) {
        config::configure(
            &mut self.regs,
            &mut self.delay,
            cfg,
            self.timeouts.config_settle_ms,
        );
        info!(
            "configured {} ip {} mask {} gw {}",
            cfg.mac, cfg.ip, cfg.subnet, cfg.gateway
        );
    }

    // ═══════════════════════════════════════════════════════════════════════
    // LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════

    /// Current Sn_SR of `handle`.
    pub fn status(&mut self, handle: SocketHandle) -> Result<SocketStatus, SocketError> {
        let block = handle.block()?;
        Ok(self.read_status(&block))
    }

    /// Open `handle` in `protocol` mode bound to `port`.
    ///
    /// A socket that is not Closed is closed first. After OPEN the socket
    /// must read back in the protocol's opened state; otherwise it is
    /// closed again and [`SocketError::StatusMismatch`] is returned. An
    /// unacknowledged OPEN also closes the socket before reporting.
    pub fn open(
        &mut self,
        handle: SocketHandle,
        protocol: Protocol,
        port: u16,
    ) -> Result<SocketHandle, SocketError> {
        let block = handle.block()?;

        let current = self.read_status(&block);
        if current != SocketStatus::Closed {
            debug!("{}: {} before open, closing", handle, current);
            self.issue(&block, Command::Close)?;
        }

        self.regs.write(block.mode(), protocol.mode());
        self.regs.write_u16(block.port(), port);
        if let Err(e) = self.issue(&block, Command::Open) {
            // The chip may still complete OPEN late and park in Init
            self.force_close(&block);
            return Err(e);
        }

        let expected = protocol.opened_status();
        let actual = self.read_status(&block);
        if actual != expected {
            warn!("{}: open landed in {}, expected {}", handle, actual, expected);
            self.force_close(&block);
            return Err(SocketError::StatusMismatch { expected, actual });
        }

        debug!("{}: open port {}", handle, port);
        Ok(handle)
    }

    /// Put an Init socket into passive TCP listen.
    pub fn listen(&mut self, handle: SocketHandle) -> Result<(), SocketError> {
        let block = handle.block()?;

        let current = self.read_status(&block);
        if current != SocketStatus::Init {
            return Err(SocketError::InvalidState {
                expected: SocketStatus::Init,
                actual: current,
            });
        }

        if let Err(e) = self.issue(&block, Command::Listen) {
            self.force_close(&block);
            return Err(e);
        }

        let actual = self.read_status(&block);
        if actual != SocketStatus::Listen {
            warn!("{}: listen landed in {}", handle, actual);
            self.force_close(&block);
            return Err(SocketError::StatusMismatch {
                expected: SocketStatus::Listen,
                actual,
            });
        }

        debug!("{}: listening", handle);
        Ok(())
    }

    /// Graceful TCP disconnect (FIN).
    pub fn disconnect(&mut self, handle: SocketHandle) -> Result<(), SocketError> {
        let block = handle.block()?;
        self.issue(&block, Command::Disconnect)
    }

    /// Immediate close, any state to Closed.
    pub fn close(&mut self, handle: SocketHandle) -> Result<(), SocketError> {
        let block = handle.block()?;
        self.issue(&block, Command::Close)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DATA PATH
    // ═══════════════════════════════════════════════════════════════════════

    /// Queue `data` in the TX window and issue SEND.
    ///
    /// Waits for Sn_TX_FSR to cover the whole payload. If it never does
    /// within `send_retries` sleeps the socket is disconnected once and
    /// [`SocketError::TxBufferTimeout`] is returned. A payload larger than
    /// the whole TX window can never fit, so it is disconnected at once and
    /// fails with [`SocketError::TooLarge`].
    pub fn send(&mut self, handle: SocketHandle, data: &[u8]) -> Result<usize, SocketError> {
        let block = handle.block()?;
        let ring = block.tx_ring();

        if data.is_empty() {
            return Err(SocketError::ZeroLength);
        }
        if data.len() > ring.capacity() {
            warn!("{}: {} byte payload exceeds TX window, disconnecting", handle, data.len());
            if let Err(e) = self.issue(&block, Command::Disconnect) {
                warn!("{}: {}", handle, e);
            }
            return Err(SocketError::TooLarge {
                len: data.len(),
                max: ring.capacity(),
            });
        }

        let needed = data.len();
        let mut retries = 0;
        let mut free = self.regs.read_u16(block.tx_free_size());
        while (free as usize) < needed {
            if retries == self.timeouts.send_retries {
                warn!(
                    "{}: TX space stuck at {} of {} after {} polls, disconnecting",
                    handle, free, needed, retries
                );
                if let Err(e) = self.issue(&block, Command::Disconnect) {
                    warn!("{}: {}", handle, e);
                }
                return Err(SocketError::TxBufferTimeout { needed, free });
            }
            self.delay.delay_ms(self.timeouts.send_poll_ms);
            retries += 1;
            free = self.regs.read_u16(block.tx_free_size());
        }

        let mut ptr = self.regs.read_u16(block.tx_write_ptr());
        for byte in data {
            self.regs.write(ring.physical(ptr), *byte);
            ptr = ptr.wrapping_add(1);
        }
        self.regs.write_u16(block.tx_write_ptr(), ptr);

        self.issue(&block, Command::Send)?;
        Ok(needed)
    }

    /// Copy up to `max_len` received bytes into `dest` and issue RECV.
    ///
    /// At most `dest.len() - 1` bytes are copied and a zero byte follows
    /// them. Whatever is not copied stays in the RX window for the next
    /// call. Returns the number of payload bytes copied.
    pub fn receive(
        &mut self,
        handle: SocketHandle,
        dest: &mut [u8],
        max_len: usize,
    ) -> Result<usize, SocketError> {
        let block = handle.block()?;
        let ring = block.rx_ring();

        if max_len == 0 {
            return Err(SocketError::ZeroLength);
        }
        if dest.len() < 2 {
            return Err(SocketError::BufferTooSmall);
        }

        let len = max_len.min(dest.len() - 1).min(ring.capacity());
        if len < max_len {
            debug!("{}: receive clamped {} -> {}", handle, max_len, len);
        }

        let mut ptr = self.regs.read_u16(block.rx_read_ptr());
        for slot in dest[..len].iter_mut() {
            *slot = self.regs.read(ring.physical(ptr));
            ptr = ptr.wrapping_add(1);
        }
        dest[len] = 0;

        self.regs.write_u16(block.rx_read_ptr(), ptr);
        self.regs.write(block.command(), Command::Recv.code());
        self.delay.delay_us(self.timeouts.recv_settle_us);

        Ok(len)
    }

    /// Bytes waiting in the RX window. Zero for an invalid handle.
    pub fn received_size(&mut self, handle: SocketHandle) -> u16 {
        match handle.block() {
            Ok(block) => self.regs.read_u16(block.rx_received_size()),
            Err(_) => 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn delay(&mut self) -> &mut D {
        &mut self.delay
    }

    pub fn registers(&self) -> &R {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn release(self) -> (R, D) {
        (self.regs, self.delay)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INTERNAL
    // ═══════════════════════════════════════════════════════════════════════

    fn read_status(&mut self, block: &SocketBlock) -> SocketStatus {
        SocketStatus::from_raw(self.regs.read(block.status()))
    }

    /// Write `cmd` to Sn_CR and wait for the chip to clear it.
    fn issue(&mut self, block: &SocketBlock, cmd: Command) -> Result<(), SocketError> {
        self.regs.write(block.command(), cmd.code());

        for _ in 0..self.timeouts.command_ack_polls {
            if self.regs.read(block.command()) == 0 {
                return Ok(());
            }
            self.delay.delay_us(self.timeouts.command_ack_poll_us);
        }

        warn!("{} not acknowledged after {} polls", cmd, self.timeouts.command_ack_polls);
        Err(SocketError::CommandTimeout(cmd))
    }

    /// Close after a failed transition. The caller already has an error to
    /// report, so a close timeout is only logged.
    fn force_close(&mut self, block: &SocketBlock) {
        if let Err(e) = self.issue(block, Command::Close) {
            warn!("close after failed transition: {}", e);
        }
    }
}
