//! Module: config
//!
//! Purpose: Compiled-in configuration for WifiRemoteController.
//!
//! Architecture:
//! - Everything is a `const`: no runtime configuration, no persistence
//! - Network credentials can be overridden at build time
//!   (`REMOTE_WIFI_SSID`, `REMOTE_WIFI_PASSWORD`)
//! - Pin assignment lives next to the drivers in `hal`
//!
//! Safety: Safe. Plain data only.

pub mod network;

pub use network::{ConfigError, NetworkConfig, NETWORK};

/// Size of the AT response window, one slot reserved. The window retains
/// `RESPONSE_BUFFER_SIZE - 1` bytes.
pub const RESPONSE_BUFFER_SIZE: usize = 256;

/// Number of buttons on the controller.
pub const NUM_BUTTONS: usize = 4;

/// Timing parameters of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Button sampling period.
    pub sample_period_ms: u32,
    /// Consecutive agreeing samples required before a transition commits.
    pub debounce_cap: u8,
    /// Minimum time between two payload transmissions.
    pub request_interval_ms: u32,
    /// Back-off before each network setup attempt.
    pub reconnect_backoff_ms: u32,
    /// Time given to the radio module to boot after the UART comes up.
    pub radio_boot_ms: u32,
    /// Time given to the operator to open a serial monitor at boot.
    pub monitor_grace_ms: u32,
}

impl TimingConfig {
    /// Nominal debounce latency once the contacts settle.
    ///
    /// The first disagreeing sample resets the counter, `cap` samples
    /// saturate it, the next one commits.
    pub const fn settle_latency_ms(&self) -> u32 {
        (self.debounce_cap as u32 + 2) * self.sample_period_ms
    }
}

/// Reference cadence of the controller.
pub const TIMING: TimingConfig = TimingConfig {
    sample_period_ms: 5,
    debounce_cap: 5,
    request_interval_ms: 20,
    reconnect_backoff_ms: 3000,
    radio_boot_ms: 1000,
    monitor_grace_ms: 5000,
};
