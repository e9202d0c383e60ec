//! Transmit loop: push the current button bitmask to the peer.
//!
//! There is no queue. Each exchange carries whatever the debouncer reports
//! at that moment, so a lost datagram is corrected by the next one.
//!
//! The interval is measured from the start of the previous exchange and must
//! be strictly exceeded. A slow exchange (waiting out `SEND OK`) therefore
//! makes the next one eligible as soon as it returns.
//!
//! Between exchanges the caller sleeps until the next due instant rather
//! than polling, so the period is set by the clock and not by how often
//! the loop wakes up. With a 1 kHz scheduler tick that gives one exchange
//! every 21 ms.

use crate::config::NetworkConfig;
use crate::hal::{Clock, SerialChannel};
use crate::link::LinkStatus;
use crate::log_globals::LOG_STREAM;
use crate::protocol::Purpose;
use crate::transport::AtTransport;

/// Only the low nibble carries button bits.
pub const PAYLOAD_MASK: u8 = 0x0F;

/// Result of one send exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransmitOutcome {
    /// Byte written and confirmed.
    Sent,
    /// No `>` prompt; the byte was not written.
    NotArmed,
    /// Byte written but `SEND OK` never came.
    Unconfirmed,
}

impl TransmitOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TransmitOutcome::Sent => "sent",
            TransmitOutcome::NotArmed => "not armed",
            TransmitOutcome::Unconfirmed => "unconfirmed",
        }
    }
}

impl core::fmt::Display for TransmitOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate-limited sender.
pub struct Transmitter<'a> {
    net: &'a NetworkConfig,
    link: &'a LinkStatus,
    interval_ms: u32,
    last_request_ms: u64,
}

impl<'a> Transmitter<'a> {
    /// The first exchange becomes due `interval_ms` after `now_ms`.
    pub fn new(net: &'a NetworkConfig, link: &'a LinkStatus, interval_ms: u32, now_ms: u64) -> Self {
        Self {
            net,
            link,
            interval_ms,
            last_request_ms: now_ms,
        }
    }

    /// Whether more than the interval has passed since the last exchange.
    #[inline]
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_request_ms) > self.interval_ms as u64
    }

    /// Milliseconds left until the next exchange is due; 0 when due.
    pub fn ms_until_due(&self, now_ms: u64) -> u32 {
        let due_at = self.last_request_ms + self.interval_ms as u64 + 1;
        due_at.saturating_sub(now_ms).min(u32::MAX as u64) as u32
    }

    /// Sleep until the next exchange is due, at least one millisecond.
    pub fn idle<C: Clock>(&self, clock: &mut C) {
        let wait = self.ms_until_due(clock.now_ms()).max(1);
        clock.delay_ms(wait);
    }

    /// Send `payload` if an exchange is due.
    ///
    /// Returns `None` when not due yet.
    pub fn poll<S: SerialChannel, C: Clock>(
        &mut self,
        transport: &mut AtTransport<S, C>,
        payload: u8,
    ) -> Option<TransmitOutcome> {
        let now = transport.clock().now_ms();
        if !self.is_due(now) {
            return None;
        }
        self.last_request_ms = now;

        let outcome = self.send_byte(transport, payload);
        match outcome {
            TransmitOutcome::Sent => self.link.record_sent(),
            TransmitOutcome::NotArmed => self.link.record_not_armed(),
            TransmitOutcome::Unconfirmed => self.link.record_unconfirmed(),
        }
        if outcome != TransmitOutcome::Sent {
            crate::rt_debug!(
                LOG_STREAM,
                transport.clock().now_us(),
                "send {:#06b}: {}",
                payload & PAYLOAD_MASK,
                outcome
            );
        }
        Some(outcome)
    }

    /// One arm / write / confirm exchange, regardless of the interval.
    pub fn send_byte<S: SerialChannel, C: Clock>(
        &self,
        transport: &mut AtTransport<S, C>,
        payload: u8,
    ) -> TransmitOutcome {
        let arm = Purpose::ArmSend.spec();
        transport.send(arm.command(self.net));
        if !transport.await_response(arm.marker(self.net).as_bytes(), arm.timeout_ms) {
            return TransmitOutcome::NotArmed;
        }

        transport.send_raw(payload & PAYLOAD_MASK);

        let confirm = Purpose::Payload.spec();
        if transport.await_response(confirm.marker(self.net).as_bytes(), confirm.timeout_ms) {
            TransmitOutcome::Sent
        } else {
            TransmitOutcome::Unconfirmed
        }
    }

    pub fn last_request_ms(&self) -> u64 {
        self.last_request_ms
    }
}
