//! UART HAL for the radio module and the console.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO17 (TX) ──────▶ ESP-01 RX
//! ESP32-S3 GPIO18 (RX) ◀────── ESP-01 TX
//! ```
//!
//! The radio link is 115200 baud 8N1 on UART1. Console input is read from
//! UART0 (GPIO44) without blocking; console output goes through stdout.
//! Pins are picked in `main`, typed by the peripheral they come from.

/// Radio serial link configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioUartConfig {
    pub baud_rate: u32,
}

impl Default for RadioUartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
        }
    }
}

/// Console serial configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleUartConfig {
    pub baud_rate: u32,
}

impl Default for ConsoleUartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::*;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::delay::NON_BLOCK;
    use esp_idf_svc::hal::gpio::{self, AnyIOPin};
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartDriver, UartRxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys::EspError;

    use super::{ConsoleUartConfig, RadioUartConfig};
    use crate::hal::SerialChannel;

    /// Radio channel over a full-duplex UART driver.
    pub struct UartChannel<'d> {
        uart: UartDriver<'d>,
    }

    impl<'d> UartChannel<'d> {
        pub fn new(uart: UartDriver<'d>) -> Self {
            Self { uart }
        }
    }

    impl SerialChannel for UartChannel<'_> {
        fn write(&mut self, bytes: &[u8]) {
            let _ = self.uart.write(bytes);
        }

        fn read_byte(&mut self) -> Option<u8> {
            let mut byte = [0u8; 1];
            match self.uart.read(&mut byte, NON_BLOCK) {
                Ok(1) => Some(byte[0]),
                _ => None,
            }
        }
    }

    /// Initialize UART1 for the radio module.
    pub fn init_radio_uart<'d>(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
        rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
        config: &RadioUartConfig,
    ) -> Result<UartChannel<'d>, EspError> {
        let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

        let driver = UartDriver::new(
            uart,
            tx_pin,
            rx_pin,
            Option::<AnyIOPin>::None, // CTS
            Option::<AnyIOPin>::None, // RTS
            &uart_config,
        )?;
        Ok(UartChannel::new(driver))
    }

    /// Non-blocking console input on UART0.
    pub struct ConsoleInput<'d> {
        uart: UartRxDriver<'d>,
    }

    impl ConsoleInput<'_> {
        /// Take one pending byte, if any.
        pub fn read_byte(&mut self) -> Option<u8> {
            let mut byte = [0u8; 1];
            match self.uart.read(&mut byte, NON_BLOCK) {
                Ok(1) => Some(byte[0]),
                _ => None,
            }
        }
    }

    /// Initialize UART0 RX for the console.
    pub fn init_console_input<'d>(
        uart: impl Peripheral<P = uart::UART0> + 'd,
        rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
        config: &ConsoleUartConfig,
    ) -> Result<ConsoleInput<'d>, EspError> {
        let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

        let driver = UartRxDriver::new(
            uart,
            rx_pin,
            Option::<AnyIOPin>::None, // CTS
            Option::<AnyIOPin>::None, // RTS
            &uart_config,
        )?;
        Ok(ConsoleInput { uart: driver })
    }
}
