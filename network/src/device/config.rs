//! Common register configuration.
//!
//! Gateway, MAC, subnet mask and source IP are written byte by byte with a
//! settle delay after each group, then the socket memory split is fixed at
//! 2 KiB TX and 2 KiB RX per socket.
//!
//! # Reference
//! - W5100 Datasheet v1.2.4, Section 3.1 (Common Registers)

use embedded_hal::delay::DelayNs;
use smoltcp::wire::{EthernetAddress, Ipv4Address};

use crate::driver::bus::RegisterAccess;

use super::registers::{GAR, MSR_2K_EACH, RMSR, SHAR, SIPR, SUBR, TMSR};

/// Addressing the chip presents on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    pub mac: EthernetAddress,
    pub ip: Ipv4Address,
    pub subnet: Ipv4Address,
    pub gateway: Ipv4Address,
}

impl NetworkConfig {
    pub const fn new(
        mac: EthernetAddress,
        ip: Ipv4Address,
        subnet: Ipv4Address,
        gateway: Ipv4Address,
    ) -> Self {
        Self {
            mac,
            ip,
            subnet,
            gateway,
        }
    }
}

impl Default for NetworkConfig {
    /// The usual bench setup: locally administered MAC on 192.168.1.0/24.
    fn default() -> Self {
        Self::new(
            EthernetAddress([0xDE, 0xAD, 0xBE, 0xEF, 0xFE, 0xED]),
            Ipv4Address::new(192, 168, 1, 177),
            Ipv4Address::new(255, 255, 255, 0),
            Ipv4Address::new(192, 168, 1, 1),
        )
    }
}

/// Program the common registers from `config`.
///
/// Order matters on some board revisions: gateway, MAC, mask, IP.
pub fn configure<R, D>(regs: &mut R, delay: &mut D, config: &NetworkConfig, settle_ms: u32)
where
    R: RegisterAccess,
    D: DelayNs,
{
    regs.write_bytes(GAR, config.gateway.as_bytes());
    delay.delay_ms(settle_ms);

    regs.write_bytes(SHAR, config.mac.as_bytes());
    delay.delay_ms(settle_ms);

    regs.write_bytes(SUBR, config.subnet.as_bytes());
    delay.delay_ms(settle_ms);

    regs.write_bytes(SIPR, config.ip.as_bytes());
    delay.delay_ms(settle_ms);

    regs.write(RMSR, MSR_2K_EACH);
    regs.write(TMSR, MSR_2K_EACH);
}
