//! Monotonic clock backed by the ESP high-resolution timer.

#[cfg(target_os = "espidf")]
pub use esp::EspClock;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::delay::FreeRtos;

    use crate::hal::Clock;

    /// `esp_timer` time plus FreeRTOS delays.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct EspClock;

    impl Clock for EspClock {
        #[inline]
        fn now_us(&self) -> i64 {
            // SAFETY: esp_timer_get_time is thread-safe and has no preconditions
            unsafe { esp_idf_svc::sys::esp_timer_get_time() }
        }

        fn delay_ms(&mut self, ms: u32) {
            FreeRtos::delay_ms(ms);
        }

        /// Sleep one tick so lower-priority tasks (and the idle task that
        /// feeds the watchdog) get to run while polling the radio.
        /// `sdkconfig.defaults` sets the tick to 1 ms.
        fn relax(&mut self) {
            FreeRtos::delay_ms(1);
        }
    }
}
