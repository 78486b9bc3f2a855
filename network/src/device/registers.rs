//! W5100 register map.
//!
//! Register offsets, command codes and status values for the WIZnet W5100.
//! Addresses are in the chip's 16-bit internal address space, reached
//! through the SPI read/write frames in `transport`.
//!
//! # Reference
//! WIZnet W5100 Datasheet v1.2.x, Section 3 (Memory Map) and Section 4
//! (Register Descriptions)

// ═══════════════════════════════════════════════════════════════════════════
// SPI FRAME OPCODES
// ═══════════════════════════════════════════════════════════════════════════

/// Opcode for a register write frame.
pub const OP_WRITE: u8 = 0xF0;
/// Opcode for a register read frame.
pub const OP_READ: u8 = 0x0F;

// ═══════════════════════════════════════════════════════════════════════════
// COMMON REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Mode Register.
pub const MR: u16 = 0x0000;
/// Gateway Address Register (4 bytes).
pub const GAR: u16 = 0x0001;
/// Subnet Mask Register (4 bytes).
pub const SUBR: u16 = 0x0005;
/// Source Hardware Address Register (6 bytes).
pub const SHAR: u16 = 0x0009;
/// Source IP Address Register (4 bytes).
pub const SIPR: u16 = 0x000F;
/// RX Memory Size Register.
pub const RMSR: u16 = 0x001A;
/// TX Memory Size Register.
pub const TMSR: u16 = 0x001B;

/// MR: software reset, self-clearing.
pub const MR_RST: u8 = 1 << 7;

/// RMSR/TMSR value giving every socket 2 KiB (2 bits per socket, 0b01).
pub const MSR_2K_EACH: u8 = 0x55;

// ═══════════════════════════════════════════════════════════════════════════
// SOCKET REGISTER BLOCKS
// ═══════════════════════════════════════════════════════════════════════════

/// Number of hardware sockets.
pub const NUM_SOCKETS: u8 = 4;

/// Address of socket 0's register block.
pub const SOCKET_BASE: u16 = 0x0400;
/// Size of one socket register block.
pub const SOCKET_BLOCK_SIZE: u16 = 0x0100;

/// Sn_MR: protocol mode.
pub const SN_MR: u16 = 0x00;
/// Sn_CR: command. Cleared by the chip once the command is accepted.
pub const SN_CR: u16 = 0x01;
/// Sn_IR: interrupt flags.
pub const SN_IR: u16 = 0x02;
/// Sn_SR: status.
pub const SN_SR: u16 = 0x03;
/// Sn_PORT: source port (2 bytes, big-endian).
pub const SN_PORT: u16 = 0x04;
/// Sn_TX_FSR: TX free size (2 bytes).
pub const SN_TX_FSR: u16 = 0x20;
/// Sn_TX_RD: TX read pointer (2 bytes).
pub const SN_TX_RD: u16 = 0x22;
/// Sn_TX_WR: TX write pointer (2 bytes).
pub const SN_TX_WR: u16 = 0x24;
/// Sn_RX_RSR: RX received size (2 bytes).
pub const SN_RX_RSR: u16 = 0x26;
/// Sn_RX_RD: RX read pointer (2 bytes).
pub const SN_RX_RD: u16 = 0x28;

/// Base address of a socket's register block.
#[inline]
pub const fn socket_base(index: u8) -> u16 {
    SOCKET_BASE + (index as u16) * SOCKET_BLOCK_SIZE
}

// ═══════════════════════════════════════════════════════════════════════════
// SOCKET BUFFER MEMORY
// ═══════════════════════════════════════════════════════════════════════════

/// Start of TX buffer memory.
pub const TX_BUF_BASE: u16 = 0x4000;
/// Start of RX buffer memory.
pub const RX_BUF_BASE: u16 = 0x6000;
/// Per-socket window with the MSR_2K_EACH allocation.
pub const BUF_WINDOW_SIZE: u16 = 0x0800;
/// Mask turning a free-running pointer into a window offset.
pub const BUF_MASK: u16 = BUF_WINDOW_SIZE - 1;

// ═══════════════════════════════════════════════════════════════════════════
// Sn_MR PROTOCOL VALUES
// ═══════════════════════════════════════════════════════════════════════════

pub const MR_CLOSED: u8 = 0x00;
pub const MR_TCP: u8 = 0x01;
pub const MR_UDP: u8 = 0x02;
pub const MR_IPRAW: u8 = 0x03;
pub const MR_MACRAW: u8 = 0x04;

// ═══════════════════════════════════════════════════════════════════════════
// Sn_CR COMMANDS
// ═══════════════════════════════════════════════════════════════════════════

pub const CR_OPEN: u8 = 0x01;
pub const CR_LISTEN: u8 = 0x02;
pub const CR_CONNECT: u8 = 0x04;
pub const CR_DISCON: u8 = 0x08;
pub const CR_CLOSE: u8 = 0x10;
pub const CR_SEND: u8 = 0x20;
pub const CR_RECV: u8 = 0x40;

// ═══════════════════════════════════════════════════════════════════════════
// Sn_SR STATUS VALUES
// ═══════════════════════════════════════════════════════════════════════════

pub const SR_CLOSED: u8 = 0x00;
pub const SR_INIT: u8 = 0x13;
pub const SR_LISTEN: u8 = 0x14;
pub const SR_SYNSENT: u8 = 0x15;
pub const SR_SYNRECV: u8 = 0x16;
pub const SR_ESTABLISHED: u8 = 0x17;
pub const SR_FIN_WAIT: u8 = 0x18;
pub const SR_CLOSING: u8 = 0x1A;
pub const SR_TIME_WAIT: u8 = 0x1B;
pub const SR_CLOSE_WAIT: u8 = 0x1C;
pub const SR_LAST_ACK: u8 = 0x1D;
pub const SR_UDP: u8 = 0x22;
pub const SR_IPRAW: u8 = 0x32;
pub const SR_MACRAW: u8 = 0x42;
pub const SR_PPPOE: u8 = 0x5F;
