//! Typed views of socket mode, command and status register values.

use core::fmt;

use crate::device::registers as regs;

/// Socket protocol, written to Sn_MR before OPEN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    IpRaw,
    MacRaw,
}

impl Protocol {
    /// Sn_MR value.
    pub const fn mode(self) -> u8 {
        match self {
            Protocol::Tcp => regs::MR_TCP,
            Protocol::Udp => regs::MR_UDP,
            Protocol::IpRaw => regs::MR_IPRAW,
            Protocol::MacRaw => regs::MR_MACRAW,
        }
    }

    /// Status the chip reports after a successful OPEN in this mode.
    pub const fn opened_status(self) -> SocketStatus {
        match self {
            Protocol::Tcp => SocketStatus::Init,
            Protocol::Udp => SocketStatus::Udp,
            Protocol::IpRaw => SocketStatus::IpRaw,
            Protocol::MacRaw => SocketStatus::MacRaw,
        }
    }
}

/// Socket command, written to Sn_CR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Open,
    Listen,
    Connect,
    Disconnect,
    Close,
    Send,
    Recv,
}

impl Command {
    /// Sn_CR value.
    pub const fn code(self) -> u8 {
        match self {
            Command::Open => regs::CR_OPEN,
            Command::Listen => regs::CR_LISTEN,
            Command::Connect => regs::CR_CONNECT,
            Command::Disconnect => regs::CR_DISCON,
            Command::Close => regs::CR_CLOSE,
            Command::Send => regs::CR_SEND,
            Command::Recv => regs::CR_RECV,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Command::Open => "OPEN",
            Command::Listen => "LISTEN",
            Command::Connect => "CONNECT",
            Command::Disconnect => "DISCON",
            Command::Close => "CLOSE",
            Command::Send => "SEND",
            Command::Recv => "RECV",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Socket status as reported by Sn_SR.
///
/// Always read fresh from the chip; the offload engine changes it on its own
/// (peer FIN, timeouts) so a cached copy would go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketStatus {
    Closed,
    Init,
    Listen,
    SynSent,
    SynRecv,
    Established,
    FinWait,
    Closing,
    TimeWait,
    CloseWait,
    LastAck,
    Udp,
    IpRaw,
    MacRaw,
    PppoE,
    /// Transitional or undocumented value.
    Unknown(u8),
}

impl SocketStatus {
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            regs::SR_CLOSED => SocketStatus::Closed,
            regs::SR_INIT => SocketStatus::Init,
            regs::SR_LISTEN => SocketStatus::Listen,
            regs::SR_SYNSENT => SocketStatus::SynSent,
            regs::SR_SYNRECV => SocketStatus::SynRecv,
            regs::SR_ESTABLISHED => SocketStatus::Established,
            regs::SR_FIN_WAIT => SocketStatus::FinWait,
            regs::SR_CLOSING => SocketStatus::Closing,
            regs::SR_TIME_WAIT => SocketStatus::TimeWait,
            regs::SR_CLOSE_WAIT => SocketStatus::CloseWait,
            regs::SR_LAST_ACK => SocketStatus::LastAck,
            regs::SR_UDP => SocketStatus::Udp,
            regs::SR_IPRAW => SocketStatus::IpRaw,
            regs::SR_MACRAW => SocketStatus::MacRaw,
            regs::SR_PPPOE => SocketStatus::PppoE,
            other => SocketStatus::Unknown(other),
        }
    }

    pub const fn raw(self) -> u8 {
        match self {
            SocketStatus::Closed => regs::SR_CLOSED,
            SocketStatus::Init => regs::SR_INIT,
            SocketStatus::Listen => regs::SR_LISTEN,
            SocketStatus::SynSent => regs::SR_SYNSENT,
            SocketStatus::SynRecv => regs::SR_SYNRECV,
            SocketStatus::Established => regs::SR_ESTABLISHED,
            SocketStatus::FinWait => regs::SR_FIN_WAIT,
            SocketStatus::Closing => regs::SR_CLOSING,
            SocketStatus::TimeWait => regs::SR_TIME_WAIT,
            SocketStatus::CloseWait => regs::SR_CLOSE_WAIT,
            SocketStatus::LastAck => regs::SR_LAST_ACK,
            SocketStatus::Udp => regs::SR_UDP,
            SocketStatus::IpRaw => regs::SR_IPRAW,
            SocketStatus::MacRaw => regs::SR_MACRAW,
            SocketStatus::PppoE => regs::SR_PPPOE,
            SocketStatus::Unknown(raw) => raw,
        }
    }

    /// One of the TCP teardown states the dispatch loop recycles with CLOSE.
    pub const fn is_teardown(self) -> bool {
        matches!(
            self,
            SocketStatus::FinWait
                | SocketStatus::Closing
                | SocketStatus::TimeWait
                | SocketStatus::CloseWait
                | SocketStatus::LastAck
        )
    }
}

impl fmt::Display for SocketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketStatus::Unknown(raw) => write!(f, "UNKNOWN({:#04x})", raw),
            other => write!(f, "{:?}", other),
        }
    }
}
