//! Simulated W5100 for host-side tests.
//!
//! Decodes the 4-byte SPI frames coming through [`Transport`] and applies
//! them to a 32 KiB register/buffer image, with enough command behavior to
//! drive the socket state machine: OPEN/LISTEN/CLOSE/DISCON status changes,
//! Sn_CR acknowledgment after a configurable number of polls, SEND draining
//! the TX window and RECV releasing RX space.

use std::vec;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::device::registers as regs;
use crate::transport::Transport;

use super::ring::RingBuffer;

const MEM_SIZE: usize = 0x8000;

/// Sn_CR reads that return the command before it is acknowledged.
pub const STUCK: u32 = u32::MAX;

#[derive(Default)]
struct SimSocket {
    /// Sn_CR reads left before the pending command clears.
    ack_remaining: u32,
    /// Reads before acknowledgment for every command; STUCK never clears.
    ack_delay: u32,
    open_result: Option<u8>,
    listen_result: Option<u8>,
    tx_free_override: Option<u16>,
    tx_rd: u16,
    rx_wr: u16,
    rx_rd_acked: u16,
    sent: Vec<u8>,
    commands: Vec<u8>,
}

pub struct SimW5100 {
    mem: Vec<u8>,
    frame: [u8; 4],
    pos: usize,
    selected: bool,
    sockets: [SimSocket; 4],
    /// Completed chip-select transactions.
    pub frames: usize,
    /// Hardware reset pulses requested.
    pub hw_resets: usize,
    /// Writes of MR_RST.
    pub soft_resets: usize,
    /// Whether `reset()` reports a wired reset line.
    pub has_reset_line: bool,
}

impl Default for SimW5100 {
    fn default() -> Self {
        Self::new()
    }
}

impl SimW5100 {
    pub fn new() -> Self {
        Self {
            mem: vec![0u8; MEM_SIZE],
            frame: [0; 4],
            pos: 0,
            selected: false,
            sockets: Default::default(),
            frames: 0,
            hw_resets: 0,
            soft_resets: 0,
            has_reset_line: false,
        }
    }

    // ── test setup ──────────────────────────────────────────────────────────

    pub fn set_status(&mut self, sock: u8, raw: u8) {
        self.mem[sr(sock)] = raw;
    }

    pub fn set_ack_delay(&mut self, sock: u8, polls: u32) {
        self.sockets[sock as usize].ack_delay = polls;
    }

    /// Status OPEN lands in instead of the protocol's normal one.
    pub fn set_open_result(&mut self, sock: u8, raw: u8) {
        self.sockets[sock as usize].open_result = Some(raw);
    }

    /// Status LISTEN lands in instead of LISTEN.
    pub fn set_listen_result(&mut self, sock: u8, raw: u8) {
        self.sockets[sock as usize].listen_result = Some(raw);
    }

    /// Pin Sn_TX_FSR to `free` regardless of SEND activity.
    pub fn set_tx_free(&mut self, sock: u8, free: u16) {
        self.sockets[sock as usize].tx_free_override = Some(free);
    }

    /// Move the TX pointers (both chip and host side) to `ptr`.
    pub fn set_tx_ptr(&mut self, sock: u8, ptr: u16) {
        self.sockets[sock as usize].tx_rd = ptr;
        self.put_u16(sock_reg(sock, regs::SN_TX_RD), ptr);
        self.put_u16(sock_reg(sock, regs::SN_TX_WR), ptr);
    }

    /// Move the RX pointers (both chip and host side) to `ptr`.
    pub fn set_rx_ptr(&mut self, sock: u8, ptr: u16) {
        let s = &mut self.sockets[sock as usize];
        s.rx_wr = ptr;
        s.rx_rd_acked = ptr;
        self.put_u16(sock_reg(sock, regs::SN_RX_RD), ptr);
    }

    /// Deliver `data` as if it arrived from the peer.
    pub fn inject_rx(&mut self, sock: u8, data: &[u8]) {
        let ring = RingBuffer::rx(sock);
        let mut wr = self.sockets[sock as usize].rx_wr;
        for b in data {
            self.mem[ring.physical(wr) as usize] = *b;
            wr = wr.wrapping_add(1);
        }
        self.sockets[sock as usize].rx_wr = wr;

        let rsr = self.get_u16(sock_reg(sock, regs::SN_RX_RSR));
        self.put_u16(sock_reg(sock, regs::SN_RX_RSR), rsr + data.len() as u16);
    }

    /// Feed everything SEND put on the wire back in as received data.
    pub fn loop_back(&mut self, sock: u8) {
        let sent = core::mem::take(&mut self.sockets[sock as usize].sent);
        self.inject_rx(sock, &sent);
    }

    // ── inspection ──────────────────────────────────────────────────────────

    pub fn reg(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    pub fn get_u16(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.mem[addr as usize], self.mem[addr as usize + 1]])
    }

    pub fn status(&self, sock: u8) -> u8 {
        self.mem[sr(sock)]
    }

    /// Bytes handed to the wire by SEND, in order.
    pub fn sent(&self, sock: u8) -> &[u8] {
        &self.sockets[sock as usize].sent
    }

    /// Sn_CR codes written, in order.
    pub fn commands(&self, sock: u8) -> &[u8] {
        &self.sockets[sock as usize].commands
    }

    pub fn command_count(&self, sock: u8, code: u8) -> usize {
        self.commands(sock).iter().filter(|c| **c == code).count()
    }

    // ── register model ──────────────────────────────────────────────────────

    fn put_u16(&mut self, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.mem[addr as usize] = hi;
        self.mem[addr as usize + 1] = lo;
    }

    fn read_reg(&mut self, addr: u16) -> u8 {
        if let Some((sock, off)) = decode_socket(addr) {
            let s = &mut self.sockets[sock as usize];
            match off {
                regs::SN_CR if self.mem[addr as usize] != 0 => {
                    if s.ack_delay == STUCK {
                        return self.mem[addr as usize];
                    }
                    if s.ack_remaining == 0 {
                        self.mem[addr as usize] = 0;
                    } else {
                        s.ack_remaining -= 1;
                    }
                }
                o if o == regs::SN_TX_FSR || o == regs::SN_TX_FSR + 1 => {
                    if let Some(free) = s.tx_free_override {
                        let [hi, lo] = free.to_be_bytes();
                        return if o == regs::SN_TX_FSR { hi } else { lo };
                    }
                }
                _ => {}
            }
        }
        self.mem[addr as usize]
    }

    fn write_reg(&mut self, addr: u16, value: u8) {
        if addr == regs::MR && value & regs::MR_RST != 0 {
            self.soft_resets += 1;
            self.mem.fill(0);
            return;
        }

        self.mem[addr as usize] = value;

        if let Some((sock, regs::SN_CR)) = decode_socket(addr) {
            self.command(sock, value);
        }
    }

    fn command(&mut self, sock: u8, code: u8) {
        let s = &mut self.sockets[sock as usize];
        s.commands.push(code);
        s.ack_remaining = s.ack_delay;

        match code {
            regs::CR_OPEN => {
                let normal = match self.mem[sock_reg(sock, regs::SN_MR) as usize] {
                    regs::MR_TCP => regs::SR_INIT,
                    regs::MR_UDP => regs::SR_UDP,
                    regs::MR_IPRAW => regs::SR_IPRAW,
                    regs::MR_MACRAW => regs::SR_MACRAW,
                    _ => regs::SR_CLOSED,
                };
                let status = s.open_result.unwrap_or(normal);
                self.mem[sr(sock)] = status;
                self.put_u16(sock_reg(sock, regs::SN_TX_FSR), regs::BUF_WINDOW_SIZE);
            }
            regs::CR_LISTEN => {
                self.mem[sr(sock)] = s.listen_result.unwrap_or(regs::SR_LISTEN);
            }
            regs::CR_CONNECT => self.mem[sr(sock)] = regs::SR_SYNSENT,
            regs::CR_DISCON => self.mem[sr(sock)] = regs::SR_FIN_WAIT,
            regs::CR_CLOSE => self.mem[sr(sock)] = regs::SR_CLOSED,
            regs::CR_SEND => {
                let ring = RingBuffer::tx(sock);
                let wr = self.get_u16(sock_reg(sock, regs::SN_TX_WR));
                let mut rd = self.sockets[sock as usize].tx_rd;
                while rd != wr {
                    let b = self.mem[ring.physical(rd) as usize];
                    self.sockets[sock as usize].sent.push(b);
                    rd = rd.wrapping_add(1);
                }
                self.sockets[sock as usize].tx_rd = rd;
                self.put_u16(sock_reg(sock, regs::SN_TX_RD), rd);
                self.put_u16(sock_reg(sock, regs::SN_TX_FSR), regs::BUF_WINDOW_SIZE);
            }
            regs::CR_RECV => {
                let rd = self.get_u16(sock_reg(sock, regs::SN_RX_RD));
                let consumed = rd.wrapping_sub(self.sockets[sock as usize].rx_rd_acked);
                let rsr = self.get_u16(sock_reg(sock, regs::SN_RX_RSR));
                self.put_u16(sock_reg(sock, regs::SN_RX_RSR), rsr.saturating_sub(consumed));
                self.sockets[sock as usize].rx_rd_acked = rd;
            }
            _ => {}
        }
    }
}

impl Transport for SimW5100 {
    fn begin(&mut self) {
        assert!(!self.selected, "chip-select asserted twice");
        self.selected = true;
        self.pos = 0;
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        assert!(self.selected, "exchange without chip-select");
        assert!(self.pos < 4, "frame longer than 4 bytes");
        self.frame[self.pos] = byte;
        self.pos += 1;

        if self.pos < 4 {
            // W5100 echoes 0x00, 0x01, 0x02 for the header bytes
            return (self.pos - 1) as u8;
        }

        let addr = u16::from_be_bytes([self.frame[1], self.frame[2]]);
        match self.frame[0] {
            regs::OP_READ => self.read_reg(addr),
            regs::OP_WRITE => {
                self.write_reg(addr, byte);
                0x03
            }
            op => panic!("bad opcode {op:#04x}"),
        }
    }

    fn end(&mut self) {
        assert!(self.selected, "chip-select released twice");
        assert_eq!(self.pos, 4, "short frame");
        self.selected = false;
        self.frames += 1;
    }

    fn reset(&mut self) -> bool {
        if self.has_reset_line {
            self.hw_resets += 1;
            self.mem.fill(0);
        }
        self.has_reset_line
    }
}

fn decode_socket(addr: u16) -> Option<(u8, u16)> {
    let end = regs::socket_base(regs::NUM_SOCKETS);
    if (regs::SOCKET_BASE..end).contains(&addr) {
        let rel = addr - regs::SOCKET_BASE;
        Some(((rel / regs::SOCKET_BLOCK_SIZE) as u8, rel % regs::SOCKET_BLOCK_SIZE))
    } else {
        None
    }
}

fn sock_reg(sock: u8, off: u16) -> u16 {
    regs::socket_base(sock) + off
}

fn sr(sock: u8) -> usize {
    sock_reg(sock, regs::SN_SR) as usize
}

/// `DelayNs` that only keeps count.
#[derive(Debug, Default)]
pub struct SimDelay {
    pub total_ns: u64,
    pub us_calls: u32,
    pub ms_calls: u32,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.us_calls += 1;
        self.total_ns += u64::from(us) * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls += 1;
        self.total_ns += u64::from(ms) * 1_000_000;
    }
}
