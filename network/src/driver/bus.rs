//! Register access over a [`Transport`].
//!
//! Every register access is one self-contained 4-byte frame:
//!
//! ```text
//! CS low | opcode | addr[15:8] | addr[7:0] | data | CS high
//! ```
//!
//! On a read the data byte sent is a dummy and the byte clocked back is the
//! register value. There is no burst mode on the W5100, so multi-byte
//! registers cost one frame per byte.

use spin::{Mutex, MutexGuard};

use crate::device::registers::{OP_READ, OP_WRITE};
use crate::transport::Transport;

/// Byte-wide access to the W5100 address space.
pub trait RegisterAccess {
    /// Read one register.
    fn read(&mut self, addr: u16) -> u8;

    /// Write one register.
    fn write(&mut self, addr: u16, value: u8);

    /// Pulse the chip's hardware reset line. Returns false if none is wired.
    fn reset_line(&mut self) -> bool {
        false
    }

    /// Read a big-endian 16-bit register pair (two frames).
    fn read_u16(&mut self, addr: u16) -> u16 {
        let hi = self.read(addr);
        let lo = self.read(addr.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    /// Write a big-endian 16-bit register pair (two frames).
    fn write_u16(&mut self, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write(addr, hi);
        self.write(addr.wrapping_add(1), lo);
    }

    /// Write consecutive registers starting at `addr`, one frame each.
    fn write_bytes(&mut self, addr: u16, values: &[u8]) {
        for (i, value) in values.iter().enumerate() {
            self.write(addr.wrapping_add(i as u16), *value);
        }
    }
}

impl<R: RegisterAccess + ?Sized> RegisterAccess for &mut R {
    #[inline]
    fn read(&mut self, addr: u16) -> u8 {
        (**self).read(addr)
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        (**self).write(addr, value)
    }

    fn reset_line(&mut self) -> bool {
        (**self).reset_line()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// EXCLUSIVE BUS
// ═══════════════════════════════════════════════════════════════════════════

/// Register access that owns its transport.
///
/// Holding a `RegisterBus` is proof that a transport was supplied, so there
/// is no "not initialized" path through `read`/`write`.
pub struct RegisterBus<T> {
    transport: T,
}

impl<T: Transport> RegisterBus<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Swap in a different transport, returning the previous one.
    pub fn replace_transport(&mut self, transport: T) -> T {
        core::mem::replace(&mut self.transport, transport)
    }

    /// Pulse the transport's reset line, if it has one.
    pub fn hardware_reset(&mut self) -> bool {
        self.transport.reset()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T: Transport> RegisterAccess for RegisterBus<T> {
    fn read(&mut self, addr: u16) -> u8 {
        let [hi, lo] = addr.to_be_bytes();
        let t = &mut self.transport;
        t.begin();
        t.exchange(OP_READ);
        t.exchange(hi);
        t.exchange(lo);
        let value = t.exchange(0x00);
        t.end();
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        let [hi, lo] = addr.to_be_bytes();
        let t = &mut self.transport;
        t.begin();
        t.exchange(OP_WRITE);
        t.exchange(hi);
        t.exchange(lo);
        t.exchange(value);
        t.end();
    }

    fn reset_line(&mut self) -> bool {
        self.hardware_reset()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SHARED BUS
// ═══════════════════════════════════════════════════════════════════════════

/// A [`RegisterBus`] that several socket controllers can use at once.
///
/// Each frame runs under the lock, so frames from different controllers
/// never interleave mid-transaction. Sequences of frames (a whole Send, for
/// example) are not atomic, which is fine because each socket only touches
/// its own register block and buffer window.
///
/// ```ignore
/// let bus = SharedBus::new(transport);
/// let mut a = W5100Driver::new(&bus, delay_a, Timeouts::default());
/// let mut b = W5100Driver::new(&bus, delay_b, Timeouts::default());
/// ```
pub struct SharedBus<T> {
    inner: Mutex<RegisterBus<T>>,
}

impl<T: Transport> SharedBus<T> {
    pub fn new(transport: T) -> Self {
        Self {
            inner: Mutex::new(RegisterBus::new(transport)),
        }
    }

    /// Exclusive access for multi-frame work that must not interleave.
    pub fn lock(&self) -> MutexGuard<'_, RegisterBus<T>> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> RegisterBus<T> {
        self.inner.into_inner()
    }
}

impl<T: Transport> RegisterAccess for &SharedBus<T> {
    fn read(&mut self, addr: u16) -> u8 {
        self.inner.lock().read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.inner.lock().write(addr, value)
    }

    fn reset_line(&mut self) -> bool {
        self.inner.lock().hardware_reset()
    }
}
