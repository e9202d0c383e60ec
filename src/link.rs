//! Link session state as seen by the controller.
//!
//! This is the controller's view, not the radio module's: it only records
//! which setup steps succeeded in the current attempt. Any failure throws
//! the session away and setup starts again from `Unconfigured`.
//!
//! `LinkStatus` is written by the main loop and read by the console, so
//! everything is atomic.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Setup progress of the current attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LinkSession {
    Unconfigured = 0,
    ModeSet = 1,
    Associated = 2,
    MuxSet = 3,
    LinkOpen = 4,
}

impl LinkSession {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => LinkSession::ModeSet,
            2 => LinkSession::Associated,
            3 => LinkSession::MuxSet,
            4 => LinkSession::LinkOpen,
            _ => LinkSession::Unconfigured,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkSession::Unconfigured => "UNCONFIGURED",
            LinkSession::ModeSet => "MODE_SET",
            LinkSession::Associated => "ASSOCIATED",
            LinkSession::MuxSet => "MUX_SET",
            LinkSession::LinkOpen => "LINK_OPEN",
        }
    }
}

impl core::fmt::Display for LinkSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe link status and counters.
pub struct LinkStatus {
    session: AtomicU8,
    /// Set once network setup has been requested.
    started: AtomicU8,
    attempts: AtomicU32,
    sent: AtomicU32,
    not_armed: AtomicU32,
    unconfirmed: AtomicU32,
}

impl LinkStatus {
    pub const fn new() -> Self {
        Self {
            session: AtomicU8::new(LinkSession::Unconfigured as u8),
            started: AtomicU8::new(0),
            attempts: AtomicU32::new(0),
            sent: AtomicU32::new(0),
            not_armed: AtomicU32::new(0),
            unconfirmed: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn session(&self) -> LinkSession {
        LinkSession::from_u8(self.session.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set_session(&self, session: LinkSession) {
        self.session.store(session as u8, Ordering::Release);
    }

    /// Mark setup as requested. Returns `false` if it already was.
    pub fn mark_started(&self) -> bool {
        self.started.swap(1, Ordering::AcqRel) == 0
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire) != 0
    }

    /// Count a setup attempt. Returns the attempt number (1-based).
    #[inline]
    pub fn record_attempt(&self) -> u32 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_not_armed(&self) {
        self.not_armed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_unconfirmed(&self) {
        self.unconfirmed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the current status.
    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            session: self.session(),
            started: self.is_started(),
            attempts: self.attempts.load(Ordering::Relaxed),
            sent: self.sent.load(Ordering::Relaxed),
            not_armed: self.not_armed.load(Ordering::Relaxed),
            unconfirmed: self.unconfirmed.load(Ordering::Relaxed),
        }
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of link status at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkSnapshot {
    pub session: LinkSession,
    pub started: bool,
    pub attempts: u32,
    pub sent: u32,
    pub not_armed: u32,
    pub unconfirmed: u32,
}
