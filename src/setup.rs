//! Module: setup
//!
//! Purpose: Bring the radio from power-on to an open UDP link.
//!
//! Architecture:
//! - One attempt walks the fixed sequence below; every required step is
//!   gated by `await_response` with the step's timeout from the command table
//! - Expensive steps (associate, open link) are preceded by a cheap probe
//!   whose success skips them; repeating them blindly can itself fail
//! - Any required step that times out abandons the attempt; the session is
//!   reset and the next attempt starts from step 1 after the back-off
//! - There is no give-up: `establish` only returns with the link open
//!
//! ```text
//!  UNCONFIGURED ─CWMODE─▶ MODE_SET ─(CWJAP? | CWJAP=)─▶ ASSOCIATED
//!       ▲                                                   │
//!       │ any timeout                                    CIPMUX
//!       │                                                   ▼
//!       └──────────────── LINK_OPEN ◀─(CIPSTATUS | CIPSTART)─ MUX_SET
//! ```
//!
//! Note: the association probe only looks for the configured SSID in the
//! reply. A module joined to a different network fails the probe and is
//! simply told to join again.

use crate::config::NetworkConfig;
use crate::hal::{Clock, SerialChannel};
use crate::link::{LinkSession, LinkStatus};
use crate::log_globals::LOG_STREAM;
use crate::protocol::Purpose;
use crate::transport::AtTransport;

/// One failed setup attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupError {
    /// Command whose reply never arrived.
    pub purpose: Purpose,
    /// Last session state reached before the failure.
    pub reached: LinkSession,
}

impl core::fmt::Display for SetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "'{}' timed out in {}", self.purpose, self.reached)
    }
}

/// Network setup state machine.
pub struct NetworkSetup<'a> {
    net: &'a NetworkConfig,
    link: &'a LinkStatus,
    backoff_ms: u32,
}

impl<'a> NetworkSetup<'a> {
    /// # Arguments
    ///
    /// * `net` - Network and peer to connect to
    /// * `link` - Status to publish session progress and attempt count into
    /// * `backoff_ms` - Wait before every attempt
    pub fn new(net: &'a NetworkConfig, link: &'a LinkStatus, backoff_ms: u32) -> Self {
        Self {
            net,
            link,
            backoff_ms,
        }
    }

    /// Run attempts until one completes.
    ///
    /// Each attempt is preceded by the back-off, the first one included:
    /// it gives the module time to settle after boot.
    pub fn establish<S: SerialChannel, C: Clock>(&self, transport: &mut AtTransport<S, C>) {
        loop {
            transport.clock_mut().delay_ms(self.backoff_ms);
            let attempt = self.link.record_attempt();

            match self.attempt(transport) {
                Ok(()) => {
                    crate::rt_info!(
                        LOG_STREAM,
                        transport.clock().now_us(),
                        "setup complete after {} attempt(s)",
                        attempt
                    );
                    return;
                }
                Err(e) => {
                    self.link.set_session(LinkSession::Unconfigured);
                    crate::rt_warn!(
                        LOG_STREAM,
                        transport.clock().now_us(),
                        "setup attempt {} failed: {}",
                        attempt,
                        e
                    );
                }
            }
        }
    }

    /// Walk the setup sequence once.
    pub fn attempt<S: SerialChannel, C: Clock>(
        &self,
        transport: &mut AtTransport<S, C>,
    ) -> Result<(), SetupError> {
        self.link.set_session(LinkSession::Unconfigured);

        self.require(transport, Purpose::SetMode)?;
        self.advance(transport, LinkSession::ModeSet);

        if self.exchange(transport, Purpose::QueryAssociation) {
            crate::rt_info!(LOG_STREAM, transport.clock().now_us(), "already associated");
        } else {
            self.require(transport, Purpose::Associate)?;
        }
        self.advance(transport, LinkSession::Associated);

        self.require(transport, Purpose::EnableMux)?;
        self.advance(transport, LinkSession::MuxSet);

        if self.exchange(transport, Purpose::QueryLink) {
            crate::rt_info!(LOG_STREAM, transport.clock().now_us(), "link already open");
        } else {
            self.require(transport, Purpose::OpenLink)?;
        }
        self.advance(transport, LinkSession::LinkOpen);

        Ok(())
    }

    /// Send the command for `purpose` and wait for its marker.
    fn exchange<S: SerialChannel, C: Clock>(
        &self,
        transport: &mut AtTransport<S, C>,
        purpose: Purpose,
    ) -> bool {
        let spec = purpose.spec();
        crate::rt_debug!(LOG_STREAM, transport.clock().now_us(), "-> {}", purpose);

        transport.send(spec.command(self.net));
        let marker = spec.marker(self.net);
        transport.await_response(marker.as_bytes(), spec.timeout_ms)
    }

    fn require<S: SerialChannel, C: Clock>(
        &self,
        transport: &mut AtTransport<S, C>,
        purpose: Purpose,
    ) -> Result<(), SetupError> {
        if self.exchange(transport, purpose) {
            Ok(())
        } else {
            Err(SetupError {
                purpose,
                reached: self.link.session(),
            })
        }
    }

    fn advance<S: SerialChannel, C: Clock>(
        &self,
        transport: &AtTransport<S, C>,
        session: LinkSession,
    ) {
        self.link.set_session(session);
        crate::rt_debug!(LOG_STREAM, transport.clock().now_us(), "session {}", session);
    }
}
