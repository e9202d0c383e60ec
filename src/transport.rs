//! Module: transport
//!
//! Purpose: Synchronous request/response primitive over the AT text protocol.
//!
//! Architecture:
//! - `send` writes a command line (CR LF terminated), fire-and-forget.
//!   Bytes still pending at that point belong to an earlier exchange and
//!   are discarded, so a trailing `OK` cannot answer the next command
//! - `await_response` polls the channel until an expected substring shows up
//!   in a sliding window of the most recent bytes, or a deadline passes
//! - No line parsing: markers such as `>` or `SEND OK` do not align with
//!   line boundaries, substring search finds them regardless of noise
//!
//! Window overrun: once full, the oldest byte is discarded for every new one.
//! Only the most recent `RESPONSE_BUFFER_SIZE - 1` bytes are searched, so a
//! marker split by more than that much preamble is not guaranteed to match.

use core::fmt::{self, Display, Write};

use crate::config::RESPONSE_BUFFER_SIZE;
use crate::hal::{Clock, SerialChannel};
use crate::log_globals::LOG_STREAM;

/// Line terminator appended to every command.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Received bytes shown when an exchange times out.
const TIMEOUT_TAIL_LEN: usize = 40;

/// Sliding window over received bytes.
///
/// Holds at most `N - 1` bytes.
pub struct ResponseWindow<const N: usize = RESPONSE_BUFFER_SIZE> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> ResponseWindow<N> {
    /// Number of bytes retained.
    pub const CAPACITY: usize = N - 1;

    pub const fn new() -> Self {
        assert!(N >= 2, "Response window needs room for at least one byte");
        Self { buf: [0u8; N], len: 0 }
    }

    /// Append a byte, dropping the oldest one when full.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        if self.len == Self::CAPACITY {
            self.buf.copy_within(1..self.len, 0);
            self.len -= 1;
        }
        self.buf[self.len] = byte;
        self.len += 1;
    }

    /// Check whether `needle` occurs anywhere in the window.
    ///
    /// An empty needle always matches.
    pub fn contains(&self, needle: &[u8]) -> bool {
        if needle.is_empty() {
            return true;
        }
        if needle.len() > self.len {
            return false;
        }
        self.as_bytes().windows(needle.len()).any(|w| w == needle)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const N: usize> Default for ResponseWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// `fmt::Write` adapter over a serial channel.
struct ChannelWriter<'a, S: SerialChannel>(&'a mut S);

impl<S: SerialChannel> Write for ChannelWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write(s.as_bytes());
        Ok(())
    }
}

/// AT command transport.
///
/// Owns the channel to the radio and the clock used for deadlines.
/// One exchange at a time; the window is reset for every `await_response`.
pub struct AtTransport<S, C> {
    channel: S,
    clock: C,
    window: ResponseWindow,
}

impl<S: SerialChannel, C: Clock> AtTransport<S, C> {
    pub fn new(channel: S, clock: C) -> Self {
        Self {
            channel,
            clock,
            window: ResponseWindow::new(),
        }
    }

    /// Write `command` followed by CR LF.
    pub fn send(&mut self, command: impl Display) {
        self.discard_input();
        let _ = write!(ChannelWriter(&mut self.channel), "{}", command);
        self.channel.write(LINE_TERMINATOR);
    }

    /// Write one byte with no framing (payload after the `>` prompt).
    pub fn send_raw(&mut self, byte: u8) {
        self.channel.write(&[byte]);
    }

    /// Wait until `expected` appears in the reply or `timeout_ms` elapses.
    ///
    /// Bytes are checked one at a time as they arrive, so a match may span
    /// several polls. Returns `false` on timeout. An empty `expected`
    /// succeeds without reading.
    pub fn await_response(&mut self, expected: &[u8], timeout_ms: u32) -> bool {
        if expected.is_empty() {
            return true;
        }
        self.window.clear();
        let start = self.clock.now_ms();

        while self.clock.now_ms().saturating_sub(start) < timeout_ms as u64 {
            match self.channel.read_byte() {
                Some(byte) => {
                    self.window.push(byte);
                    if self.window.contains(expected) {
                        crate::rt_trace!(
                            LOG_STREAM,
                            self.clock.now_us(),
                            "found '{}'",
                            Printable(expected)
                        );
                        return true;
                    }
                }
                None => self.clock.relax(),
            }
        }

        let reply = self.window.as_bytes();
        let tail = &reply[reply.len().saturating_sub(TIMEOUT_TAIL_LEN)..];
        crate::rt_debug!(
            LOG_STREAM,
            self.clock.now_us(),
            "timeout: no '{}' within {} ms, got '{}'",
            Printable(expected),
            timeout_ms,
            Printable(tail)
        );
        false
    }

    /// Discard bytes that arrived outside an exchange.
    ///
    /// Returns how many bytes were dropped.
    pub fn drain_unsolicited(&mut self) -> usize {
        let count = self.discard_input();
        if count > 0 {
            crate::rt_debug!(
                LOG_STREAM,
                self.clock.now_us(),
                "radio: {}",
                Printable(self.window.as_bytes())
            );
        }
        count
    }

    /// Read and drop everything pending; the tail stays in the window.
    fn discard_input(&mut self) -> usize {
        self.window.clear();
        let mut count = 0;
        while let Some(byte) = self.channel.read_byte() {
            self.window.push(byte);
            count += 1;
        }
        count
    }

    /// What the last exchange received (or the last discarded input).
    pub fn last_reply(&self) -> &[u8] {
        self.window.as_bytes()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn channel(&self) -> &S {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut S {
        &mut self.channel
    }
}

/// Bytes shown as text, with control characters escaped.
pub struct Printable<'a>(pub &'a [u8]);

impl Display for Printable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0 {
            match b {
                b'\r' => f.write_str("\\r")?,
                b'\n' => f.write_str("\\n")?,
                0x20..=0x7E => f.write_char(b as char)?,
                _ => write!(f, "\\x{:02x}", b)?,
            }
        }
        Ok(())
    }
}
