//! # WifiRemoteController
//!
//! Four-button Wi-Fi remote: debounced button state goes out as one byte per
//! UDP datagram through an ESP-01 radio module driven with AT commands.
//!
//! ## Architecture
//!
//! ```text
//! 5 ms timer ──▶ Debouncer ──▶ ButtonBoard (atomics)
//!                                   │
//! main loop: NetworkSetup::establish (once), then every 20 ms
//!            Transmitter::poll(board.current_state()) ──▶ AtTransport ──▶ UART1
//! ```
//!
//! Core logic is `no_std` and written against the traits in [`hal`]; the
//! ESP-IDF implementations are only compiled for the target.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod debounce;
pub mod hal;
pub mod link;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod protocol;
pub mod setup;
pub mod transmit;
pub mod transport;

pub use config::{NetworkConfig, NETWORK, TIMING};
pub use debounce::{ButtonBoard, ButtonLine, ButtonState, Debouncer};
pub use link::{LinkSession, LinkStatus};
pub use log_globals::LOG_STREAM;
pub use setup::{NetworkSetup, SetupError};
pub use transmit::{TransmitOutcome, Transmitter};
pub use transport::AtTransport;
