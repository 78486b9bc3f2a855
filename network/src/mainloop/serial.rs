//! Console text output.
//!
//! Minimal, no-allocation text output to a byte sink registered by the host
//! (usually its UART transmit routine). With no sink registered everything
//! is dropped.

use log::Level;
use spin::Mutex;

/// Host routine that puts one byte on the console.
pub type ByteSink = fn(u8);

static SINK: Mutex<Option<ByteSink>> = Mutex::new(None);

/// Register the console sink, returning the previous one.
pub fn set_sink(sink: ByteSink) -> Option<ByteSink> {
    SINK.lock().replace(sink)
}

/// Drop the console sink.
pub fn clear_sink() -> Option<ByteSink> {
    SINK.lock().take()
}

/// Write a single byte to the console.
#[inline]
pub fn write_byte(byte: u8) {
    // Copy out so the sink runs without the lock held
    let sink = *SINK.lock();
    if let Some(sink) = sink {
        sink(byte);
    }
}

/// Write a string to the console.
#[inline]
pub fn print(s: &str) {
    for byte in s.bytes() {
        write_byte(byte);
    }
}

/// Write a string with newline.
#[inline]
pub fn println(s: &str) {
    print(s);
    print("\r\n");
}

fn hex_digit(nibble: u8) -> u8 {
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'a' + nibble - 10
    }
}

/// Print a byte as two hex digits.
pub fn print_hex_byte(value: u8) {
    write_byte(hex_digit(value >> 4));
    write_byte(hex_digit(value & 0xF));
}

/// Print a u16 as hex with 0x prefix.
pub fn print_hex(value: u16) {
    print("0x");
    for byte in value.to_be_bytes() {
        print_hex_byte(byte);
    }
}

/// Print a u32 as decimal.
pub fn print_u32(value: u32) {
    let mut buf = [0u8; 10];
    let mut i = buf.len();
    let mut val = value;
    loop {
        i -= 1;
        buf[i] = b'0' + (val % 10) as u8;
        val /= 10;
        if val == 0 {
            break;
        }
    }
    for byte in &buf[i..] {
        write_byte(*byte);
    }
}

/// Print MAC address in xx:xx:xx:xx:xx:xx format.
pub fn print_mac(mac: &[u8; 6]) {
    for (i, byte) in mac.iter().enumerate() {
        if i > 0 {
            print(":");
        }
        print_hex_byte(*byte);
    }
}

/// Print IPv4 address in dotted decimal.
pub fn print_ipv4(octets: &[u8; 4]) {
    for (i, octet) in octets.iter().enumerate() {
        if i > 0 {
            print(".");
        }
        print_u32(*octet as u32);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// LOG MIRROR
// ═══════════════════════════════════════════════════════════════════════════

/// Mirror every record the ring logger keeps onto the console.
pub fn attach_to_log() {
    ethershield_core::LOGGER.set_console(log_line);
}

fn log_line(level: Level, line: &str) {
    print("[");
    print(level.as_str());
    print("] ");
    println(line);
}
