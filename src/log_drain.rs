//! Log output to the console UART.
//!
//! Drains a [`LogStream`] and writes formatted lines to any `core::fmt::Write`.
//! On the controller the sink is the USB/UART0 console; the drain runs on its
//! own thread so a slow console never stalls the main loop.
//!
//! ```text
//! LOG_STREAM ──▶ LogDrain ──▶ "[   1234567] INFO: RIGHT pressed"
//! ```

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Interval between dropped-message reports.
pub const DROPPED_REPORT_INTERVAL_US: i64 = 10_000_000;

/// Format log entry to a writer.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn write_log_entry(entry: &LogEntry, out: &mut dyn Write) -> core::fmt::Result {
    write!(
        out,
        "[{:10}] {}: {}\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    )
}

/// Log consumer state.
pub struct LogDrain<'a, const N: usize = { crate::logging::LOG_BUFFER_SIZE }> {
    stream: &'a LogStream<N>,
    last_dropped_report_us: i64,
}

impl<'a, const N: usize> LogDrain<'a, N> {
    /// Create a drain over `stream`.
    pub fn new(stream: &'a LogStream<N>) -> Self {
        Self {
            stream,
            last_dropped_report_us: 0,
        }
    }

    /// Write every pending entry to `out`.
    ///
    /// Returns the number of entries written. Every `DROPPED_REPORT_INTERVAL_US`
    /// a warning line with the dropped count is emitted (if any were dropped).
    pub fn drain_into(&mut self, now_us: i64, out: &mut dyn Write) -> usize {
        let mut written = 0;

        while let Some(entry) = self.stream.drain() {
            let _ = write_log_entry(&entry, out);
            written += 1;
        }

        if now_us - self.last_dropped_report_us >= DROPPED_REPORT_INTERVAL_US {
            let dropped = self.stream.dropped();
            if dropped > 0 {
                let _ = write!(out, "[WARN] Dropped: {}\n", dropped);
                self.stream.reset_dropped();
            }
            self.last_dropped_report_us = now_us;
        }

        written
    }
}
