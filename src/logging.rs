//! RT-safe logging for WifiRemoteController.
//!
//! # Architecture
//!
//! ```text
//! main loop / timer       LogStream             drain thread
//! ─────────────────       ─────────             ────────────
//!
//! rt_info!() ─────────▶ [L0][L1][L2] ────────▶ console UART
//! non-blocking           lock-free              blocking ok
//! ```
//!
//! # Rules
//!
//! - Producers never block and never allocate
//! - Messages are dropped (and counted) when the ring is full
//! - A slot becomes visible to the drain only after it is fully written
//! - Entries above the runtime level (`set_max_level`) are discarded at the call site

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Convert from raw u8 value (saturates at Trace).
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

#[cfg(feature = "debug")]
const DEFAULT_MAX_LEVEL: LogLevel = LogLevel::Debug;
#[cfg(not(feature = "debug"))]
const DEFAULT_MAX_LEVEL: LogLevel = LogLevel::Info;

static MAX_LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_MAX_LEVEL as u8);

/// Set the most verbose level that is still recorded.
pub fn set_max_level(level: LogLevel) {
    MAX_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Current most verbose recorded level.
pub fn max_level() -> LogLevel {
    LogLevel::from_u8(MAX_LEVEL.load(Ordering::Relaxed))
}

/// Check whether `level` passes the runtime filter.
#[inline]
pub fn enabled(level: LogLevel) -> bool {
    level as u8 <= MAX_LEVEL.load(Ordering::Relaxed)
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: i64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text (lossy: invalid UTF-8 yields a placeholder).
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Ring slot. `seq` tells producers and the consumer whose turn it is:
/// `seq == pos` free for the producer at `pos`, `seq == pos + 1` ready
/// for the consumer at `pos`.
struct Slot {
    seq: AtomicU32,
    entry: UnsafeCell<LogEntry>,
}

impl Slot {
    const EMPTY: Self = Self {
        seq: AtomicU32::new(0),
        entry: UnsafeCell::new(LogEntry::EMPTY),
    };
}

/// Lock-free log stream (multiple producers, single consumer).
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: A producer only touches a slot after winning the CAS on write_idx
// for that position; the consumer only touches it after the producer's
// Release store of seq. No slot is ever aliased mutably.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");

        let mut slots = [Slot::EMPTY; N];
        let mut i = 0;
        while i < N {
            slots[i].seq = AtomicU32::new(i as u32);
            i += 1;
        }

        Self {
            slots,
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    #[inline]
    pub fn push(&self, timestamp_us: i64, level: LogLevel, msg: &[u8]) -> bool {
        self.publish(timestamp_us, level, |buf| {
            let len = msg.len().min(MAX_MSG_LEN);
            buf[..len].copy_from_slice(&msg[..len]);
            len
        })
    }

    /// Push a formatted log entry, formatting straight into the slot.
    ///
    /// Messages longer than `MAX_MSG_LEN` are truncated.
    #[inline]
    pub fn push_fmt(&self, timestamp_us: i64, level: LogLevel, args: core::fmt::Arguments<'_>) -> bool {
        self.publish(timestamp_us, level, |buf| format_to_buffer(buf, args))
    }

    fn publish(
        &self,
        timestamp_us: i64,
        level: LogLevel,
        fill: impl FnOnce(&mut [u8; MAX_MSG_LEN]) -> usize,
    ) -> bool {
        let Some(pos) = self.reserve() else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        };
        let slot = &self.slots[(pos as usize) & Self::MASK];

        // SAFETY: this producer owns the slot until seq is bumped
        unsafe {
            let entry = &mut *slot.entry.get();
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = fill(&mut entry.msg) as u8;
        }
        slot.seq.store(pos.wrapping_add(1), Ordering::Release);
        true
    }

    /// Claim the next write position, or `None` if the ring is full.
    fn reserve(&self) -> Option<u32> {
        let mut pos = self.write_idx.load(Ordering::Relaxed);
        loop {
            let slot = &self.slots[(pos as usize) & Self::MASK];
            let seq = slot.seq.load(Ordering::Acquire);
            let diff = seq.wrapping_sub(pos) as i32;

            if diff == 0 {
                match self.write_idx.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return Some(pos),
                    Err(current) => pos = current,
                }
            } else if diff < 0 {
                // Slot still holds an entry from the previous lap
                return None;
            } else {
                pos = self.write_idx.load(Ordering::Relaxed);
            }
        }
    }

    /// Drain next log entry (single consumer).
    ///
    /// Returns `None` if no entries available.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let pos = self.read_idx.load(Ordering::Relaxed);
        let slot = &self.slots[(pos as usize) & Self::MASK];

        if slot.seq.load(Ordering::Acquire) != pos.wrapping_add(1) {
            return None;
        }

        // SAFETY: producer finished writing (seq == pos + 1), single consumer
        let entry = unsafe { *slot.entry.get() };

        slot.seq.store(pos.wrapping_add(N as u32), Ordering::Release);
        self.read_idx.store(pos.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Check if there are entries to drain.
    #[inline]
    pub fn has_entries(&self) -> bool {
        self.pending() > 0
    }

    /// Get number of entries reserved but not yet drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Acquire);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating on overflow.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// Truncating `fmt::Write` over a byte slice.
pub(crate) struct BufWriter<'a> {
    pub(crate) buf: &'a mut [u8],
    pub(crate) pos: usize,
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// RT-safe log macro.
///
/// Use this instead of println! anywhere on the controller.
///
/// # Example
///
/// ```ignore
/// rt_log!(LogLevel::Info, LOG_STREAM, now_us, "{} pressed", line);
/// ```
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let level = $level;
        if $crate::logging::enabled(level) {
            $stream.push_fmt($timestamp, level, format_args!($($arg)*));
        }
    }};
}

/// RT-safe info log.
#[macro_export]
macro_rules! rt_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe warning log.
#[macro_export]
macro_rules! rt_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe error log.
#[macro_export]
macro_rules! rt_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe debug log.
#[macro_export]
macro_rules! rt_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

/// RT-safe trace log (maximum verbosity).
#[macro_export]
macro_rules! rt_trace {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Trace, $stream, $timestamp, $($arg)*)
    };
}
