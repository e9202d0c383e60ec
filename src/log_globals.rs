//! Global log stream instance.
//!
//! Producers: main loop, network setup, transmit loop, console.
//! Consumer: the log drain thread (see `log_drain`).

use crate::logging::LogStream;

/// The controller's log stream.
pub static LOG_STREAM: LogStream = LogStream::new();
