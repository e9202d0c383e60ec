//! WifiRemoteController - Main entry point
//!
//! Boot sequence:
//! 1. Log drain thread on the console, serial monitor grace delay
//! 2. Radio UART, boot delay, flush of the module's boot banner
//! 3. Button pins and the 5 ms debounce timer
//! 4. Start gate (debug builds wait for `start` on the console)
//! 5. Network setup, retried until the link is open
//! 6. Main loop: console, button events, transmit

#[cfg(target_os = "espidf")]
fn main() -> Result<(), esp_idf_svc::sys::EspError> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!(
        "{}: firmware image for the ESP32-S3, nothing to run on the host",
        wifi_remote_controller::console::VERSION
    );
}

#[cfg(target_os = "espidf")]
mod firmware {
    use core::fmt;
    use std::io::Write as _;
    use std::time::Duration;

    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::IOPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::sys::EspError;
    use esp_idf_svc::timer::EspTaskTimerService;

    use wifi_remote_controller::config::{NETWORK, TIMING};
    use wifi_remote_controller::console::{Console, ConsoleContext};
    use wifi_remote_controller::debounce::{ButtonBoard, Debouncer, PinInputs};
    use wifi_remote_controller::hal::gpio::init_button_pins;
    use wifi_remote_controller::hal::uart::{init_console_input, init_radio_uart, ConsoleInput};
    use wifi_remote_controller::hal::{Clock, ConsoleUartConfig, EspClock, RadioUartConfig};
    use wifi_remote_controller::link::LinkStatus;
    use wifi_remote_controller::log_drain::LogDrain;
    use wifi_remote_controller::setup::NetworkSetup;
    use wifi_remote_controller::transmit::Transmitter;
    use wifi_remote_controller::transport::AtTransport;
    use wifi_remote_controller::{rt_error, rt_info, LOG_STREAM};

    static BOARD: ButtonBoard = ButtonBoard::new();
    static LINK: LinkStatus = LinkStatus::new();

    const LOG_DRAIN_STACK: usize = 4096;
    const LOG_DRAIN_IDLE_MS: u32 = 10;

    /// `fmt::Write` over stdout (the console UART).
    struct Stdout;

    impl fmt::Write for Stdout {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            std::io::stdout()
                .write_all(s.as_bytes())
                .map_err(|_| fmt::Error)
        }
    }

    fn flush_stdout() {
        let _ = std::io::stdout().flush();
    }

    fn spawn_log_drain() {
        let spawned = std::thread::Builder::new()
            .name("log-drain".into())
            .stack_size(LOG_DRAIN_STACK)
            .spawn(|| {
                let clock = EspClock;
                let mut drain = LogDrain::new(&LOG_STREAM);
                loop {
                    if drain.drain_into(clock.now_us(), &mut Stdout) > 0 {
                        flush_stdout();
                    } else {
                        FreeRtos::delay_ms(LOG_DRAIN_IDLE_MS);
                    }
                }
            });

        if spawned.is_err() {
            // No drain: logs stay in the ring and get dropped
            let _ = writeln!(std::io::stdout(), "[ERROR] log drain thread not started");
        }
    }

    /// Feed pending console input to the console.
    fn poll_console(console: &mut Console, input: &mut ConsoleInput<'_>, ctx: &ConsoleContext<'_>) {
        let mut any = false;
        while let Some(byte) = input.read_byte() {
            console.process_byte(byte, ctx, &mut Stdout);
            any = true;
        }
        if any {
            flush_stdout();
        }
    }

    pub fn run() -> Result<(), EspError> {
        esp_idf_svc::sys::link_patches();

        spawn_log_drain();

        // Time to open a serial monitor
        FreeRtos::delay_ms(TIMING.monitor_grace_ms);

        let clock = EspClock;
        rt_info!(LOG_STREAM, clock.now_us(), "{}", wifi_remote_controller::console::VERSION);

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        // Console: UART0 RX on GPIO44
        let mut console_input =
            init_console_input(peripherals.uart0, pins.gpio44, &ConsoleUartConfig::default())?;
        let mut console = Console::new();
        let ctx = ConsoleContext {
            buttons: &BOARD,
            link: &LINK,
        };

        // Radio: UART1, TX GPIO17, RX GPIO18
        let radio = init_radio_uart(
            peripherals.uart1,
            pins.gpio17,
            pins.gpio18,
            &RadioUartConfig::default(),
        )?;
        FreeRtos::delay_ms(TIMING.radio_boot_ms);
        let mut transport = AtTransport::new(radio, clock);
        transport.drain_unsolicited();

        // Buttons in payload bit order: RIGHT GPIO4, DOWN GPIO5, LEFT GPIO6, UP GPIO7
        let drivers = init_button_pins([
            pins.gpio4.downgrade(),
            pins.gpio5.downgrade(),
            pins.gpio6.downgrade(),
            pins.gpio7.downgrade(),
        ])?;
        let mut debouncer = Debouncer::new(&BOARD, PinInputs::new(drivers), TIMING.debounce_cap);

        let timer_service = EspTaskTimerService::new()?;
        let sampler = timer_service.timer(move || debouncer.sample())?;
        sampler.every(Duration::from_millis(TIMING.sample_period_ms as u64))?;

        console.print_banner(&mut Stdout);
        flush_stdout();

        if let Err(e) = NETWORK.validate() {
            rt_error!(LOG_STREAM, clock.now_us(), "network config: {}", e);
            loop {
                poll_console(&mut console, &mut console_input, &ctx);
                FreeRtos::delay_ms(LOG_DRAIN_IDLE_MS);
            }
        }

        if cfg!(feature = "debug") {
            rt_info!(LOG_STREAM, clock.now_us(), "waiting for 'start'");
            while !LINK.is_started() {
                poll_console(&mut console, &mut console_input, &ctx);
                FreeRtos::delay_ms(LOG_DRAIN_IDLE_MS);
            }
        } else {
            LINK.mark_started();
        }
        rt_info!(LOG_STREAM, clock.now_us(), "network setup started");

        NetworkSetup::new(&NETWORK, &LINK, TIMING.reconnect_backoff_ms).establish(&mut transport);

        let mut transmitter = Transmitter::new(
            &NETWORK,
            &LINK,
            TIMING.request_interval_ms,
            transport.clock().now_ms(),
        );

        loop {
            poll_console(&mut console, &mut console_input, &ctx);

            for event in BOARD.drain_events() {
                rt_info!(LOG_STREAM, clock.now_us(), "{} {}", event.line, event.state);
            }

            transport.drain_unsolicited();

            if transmitter
                .poll(&mut transport, BOARD.current_state())
                .is_none()
            {
                transmitter.idle(transport.clock_mut());
            }
        }
    }
}
