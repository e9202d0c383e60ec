//! Hardware Abstraction Layer for WifiRemoteController.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Business logic stays in core modules, HAL is just I/O.
//!
//! The traits below are the seams the core modules are written against;
//! host tests provide their own implementations.

pub mod gpio;
pub mod uart;
pub mod clock;

pub use uart::{ConsoleUartConfig, RadioUartConfig};

#[cfg(target_os = "espidf")]
pub use clock::EspClock;

/// Byte channel to the radio module.
///
/// Writes are fire-and-forget: the link to the module is assumed reliable
/// and a failed write shows up as a missing reply.
pub trait SerialChannel {
    /// Queue bytes for transmission.
    fn write(&mut self, bytes: &[u8]);

    /// Take one received byte, if any. Never blocks.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Monotonic time source and scheduler hooks.
pub trait Clock {
    /// Microseconds since boot.
    fn now_us(&self) -> i64;

    /// Milliseconds since boot.
    fn now_ms(&self) -> u64 {
        (self.now_us() / 1000) as u64
    }

    /// Block the calling task for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Give other tasks a chance to run while polling.
    fn relax(&mut self);
}
