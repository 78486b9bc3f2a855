// Global logging backend for ethershield

use core::fmt::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::{Mutex, MutexGuard};

/// Number of records retained before the oldest is overwritten.
pub const MAX_LOG_ENTRIES: usize = 64;

/// Bytes kept per record. Longer messages are cut at a char boundary.
pub const MAX_LINE_LEN: usize = 96;

/// Console mirror, called once per record with the formatted line.
pub type ConsoleHook = fn(Level, &str);

/// One retained log record.
#[derive(Clone, Copy)]
pub struct LogEntry {
    level: Level,
    len: usize,
    text: [u8; MAX_LINE_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        level: Level::Info,
        len: 0,
        text: [0u8; MAX_LINE_LEN],
    };

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        // LineWriter only ever stops on a char boundary
        core::str::from_utf8(&self.text[..self.len]).unwrap_or("")
    }
}

impl fmt::Debug for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogEntry")
            .field("level", &self.level)
            .field("message", &self.message())
            .finish()
    }
}

/// Truncating `fmt::Write` into a fixed line buffer.
struct LineWriter<'a> {
    buf: &'a mut [u8; MAX_LINE_LEN],
    len: usize,
}

impl Write for LineWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = MAX_LINE_LEN - self.len;
        let mut n = s.len().min(room);
        while !s.is_char_boundary(n) {
            n -= 1;
        }
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

struct Ring {
    entries: [LogEntry; MAX_LOG_ENTRIES],
    /// Total records ever written; `count % MAX_LOG_ENTRIES` is the next slot.
    count: usize,
}

/// `log::Log` implementation backed by a fixed ring of formatted records.
pub struct RingLogger {
    level: LevelFilter,
    ring: Mutex<Ring>,
    console: Mutex<Option<ConsoleHook>>,
}

impl RingLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            level,
            ring: Mutex::new(Ring {
                entries: [LogEntry::EMPTY; MAX_LOG_ENTRIES],
                count: 0,
            }),
            console: Mutex::new(None),
        }
    }

    /// Mirror every accepted record to `hook` as well as the ring.
    pub fn set_console(&self, hook: ConsoleHook) {
        *self.console.lock() = Some(hook);
    }

    /// Records currently retained.
    pub fn len(&self) -> usize {
        self.ring.lock().count.min(MAX_LOG_ENTRIES)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records written since creation, including overwritten ones.
    pub fn total(&self) -> usize {
        self.ring.lock().count
    }

    pub fn clear(&self) {
        self.ring.lock().count = 0;
    }

    /// All retained records, oldest first.
    pub fn iter(&self) -> LogIterator<'_> {
        self.last(MAX_LOG_ENTRIES)
    }

    /// The last `n` records (up to MAX_LOG_ENTRIES), oldest first.
    ///
    /// The ring stays locked while the iterator is alive.
    pub fn last(&self, n: usize) -> LogIterator<'_> {
        let ring = self.ring.lock();
        let available = ring.count.min(MAX_LOG_ENTRIES);
        let remaining = n.min(available);
        let start = (ring.count - remaining) % MAX_LOG_ENTRIES;

        LogIterator {
            ring,
            next: start,
            remaining,
        }
    }

    fn push(&self, record: &Record<'_>) -> LogEntry {
        let mut entry = LogEntry::EMPTY;
        entry.level = record.level();

        let mut w = LineWriter {
            buf: &mut entry.text,
            len: 0,
        };
        let _ = write!(w, "[{}] {}", record.target(), record.args());
        entry.len = w.len;

        let mut ring = self.ring.lock();
        let idx = ring.count % MAX_LOG_ENTRIES;
        ring.entries[idx] = entry;
        ring.count += 1;

        entry
    }
}

impl Log for RingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = self.push(record);

        // Copy the hook out so the console runs without our locks held
        let hook = *self.console.lock();
        if let Some(hook) = hook {
            hook(entry.level(), entry.message());
        }
    }

    fn flush(&self) {}
}

/// Iterator over retained records in chronological order.
pub struct LogIterator<'a> {
    ring: MutexGuard<'a, Ring>,
    next: usize,
    remaining: usize,
}

impl Iterator for LogIterator<'_> {
    type Item = LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let entry = self.ring.entries[self.next];
        self.next = (self.next + 1) % MAX_LOG_ENTRIES;
        self.remaining -= 1;

        Some(entry)
    }
}

/// Process-wide logger installed by [`init`].
pub static LOGGER: RingLogger = RingLogger::new(LevelFilter::Trace);

/// Install [`LOGGER`] as the `log` backend.
///
/// Fails if another logger was already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
