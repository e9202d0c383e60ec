//! Host stand-ins for the controller's hardware.
//!
//! - `ScriptedInputs`: button levels set directly by the test
//! - `MockPin`: `embedded_hal` input pin with a settable level or a read error
//! - `SimRadio`: AT module that answers command lines from a rule list
//! - `ManualClock`: time only moves when the code under test waits

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};

use wifi_remote_controller::config::NUM_BUTTONS;
use wifi_remote_controller::debounce::{ButtonInputs, ButtonLine, ButtonState};
use wifi_remote_controller::hal::{Clock, SerialChannel};

// --- Buttons ---

/// Button levels controlled by the test.
pub struct ScriptedInputs {
    pub states: [ButtonState; NUM_BUTTONS],
    pub reads: usize,
}

impl ScriptedInputs {
    pub fn released() -> Self {
        Self {
            states: [ButtonState::Released; NUM_BUTTONS],
            reads: 0,
        }
    }

    pub fn set(&mut self, line: ButtonLine, state: ButtonState) {
        self.states[line.index()] = state;
    }
}

impl ButtonInputs for ScriptedInputs {
    fn read(&mut self, line: ButtonLine) -> ButtonState {
        self.reads += 1;
        self.states[line.index()]
    }
}

/// Input pin with a settable level.
#[derive(Default)]
pub struct MockPin {
    pub low: bool,
    pub fail: bool,
}

impl MockPin {
    pub fn low() -> Self {
        Self { low: true, fail: false }
    }

    pub fn high() -> Self {
        Self { low: false, fail: false }
    }

    pub fn broken() -> Self {
        Self { low: true, fail: true }
    }
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        Ok(!self.low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        Ok(self.low)
    }
}

// --- Clock ---

/// Clock that only moves when the code under test waits.
///
/// Waits are rounded up to whole scheduler ticks, like `FreeRtos::delay_ms`;
/// `relax` costs one tick. The default tick is 1 ms.
pub struct ManualClock {
    pub now_us: i64,
    pub tick_ms: u32,
    pub delays: Vec<u32>,
    pub relaxes: u64,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::with_tick(1)
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick(tick_ms: u32) -> Self {
        Self {
            now_us: 0,
            tick_ms,
            delays: Vec::new(),
            relaxes: 0,
        }
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.now_us += (ms * 1000) as i64;
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> i64 {
        self.now_us
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        let ticks = ms.div_ceil(self.tick_ms);
        self.advance_ms((ticks * self.tick_ms) as u64);
    }

    fn relax(&mut self) {
        self.relaxes += 1;
        self.advance_ms(self.tick_ms as u64);
    }
}

// --- Radio ---

struct Rule {
    prefix: String,
    reply: Vec<u8>,
    /// `None` = unlimited
    remaining: Option<usize>,
}

/// Simulated AT radio module.
///
/// Every CR LF terminated line written is recorded and matched against the
/// rules in insertion order; the first live rule whose prefix matches queues
/// its reply. Lines with no matching rule get no reply. After a `>` prompt
/// the next single raw byte is taken as payload.
#[derive(Default)]
pub struct SimRadio {
    rules: Vec<Rule>,
    rx: VecDeque<u8>,
    partial: Vec<u8>,
    pub lines: Vec<String>,
    pub payloads: Vec<u8>,
    pub written: Vec<u8>,
    awaiting_payload: bool,
    payload_reply: Vec<u8>,
}

impl SimRadio {
    pub fn new() -> Self {
        Self {
            payload_reply: b"\r\nRecv 1 bytes\r\n\r\nSEND OK\r\n".to_vec(),
            ..Self::default()
        }
    }

    /// Answer every line starting with `prefix`.
    pub fn respond(&mut self, prefix: &str, reply: &str) -> &mut Self {
        self.rules.push(Rule {
            prefix: prefix.to_string(),
            reply: reply.as_bytes().to_vec(),
            remaining: None,
        });
        self
    }

    /// Answer the next `times` lines starting with `prefix`.
    pub fn respond_times(&mut self, prefix: &str, reply: &str, times: usize) -> &mut Self {
        self.rules.push(Rule {
            prefix: prefix.to_string(),
            reply: reply.as_bytes().to_vec(),
            remaining: Some(times),
        });
        self
    }

    /// Ignore the next `times` lines starting with `prefix`.
    pub fn silence_times(&mut self, prefix: &str, times: usize) -> &mut Self {
        self.respond_times(prefix, "", times)
    }

    /// Reply sent after a payload byte (default: `SEND OK`).
    pub fn payload_reply(&mut self, reply: &str) -> &mut Self {
        self.payload_reply = reply.as_bytes().to_vec();
        self
    }

    /// Queue bytes as if sent by the module unprompted.
    pub fn inject(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// A module that completes setup on the first try, joining and opening
    /// the link from scratch.
    pub fn healthy() -> Self {
        let mut radio = Self::new();
        radio.healthy_rules();
        radio
    }

    /// Rules of `healthy`, appended after any rules already present.
    pub fn healthy_rules(&mut self) -> &mut Self {
        self.respond("AT+CWMODE=1", "AT+CWMODE=1\r\n\r\nOK\r\n")
            .respond("AT+CWJAP?", "No AP\r\n\r\nOK\r\n")
            .respond("AT+CWJAP=", "WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n")
            .respond("AT+CIPMUX=1", "\r\nOK\r\n")
            .respond("AT+CIPSTATUS", "STATUS:2\r\n\r\nOK\r\n")
            .respond("AT+CIPSTART=", "0,CONNECT\r\n\r\nOK\r\n")
            .respond("AT+CIPSEND=", "\r\nOK\r\n> ")
    }

    pub fn count_lines(&self, prefix: &str) -> usize {
        self.lines.iter().filter(|l| l.starts_with(prefix)).count()
    }

    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    fn on_line(&mut self, line: String) {
        let rule = self.rules.iter_mut().find(|r| {
            line.starts_with(r.prefix.as_str()) && r.remaining.map_or(true, |n| n > 0)
        });

        if let Some(rule) = rule {
            if let Some(n) = rule.remaining.as_mut() {
                *n -= 1;
            }
            if rule.reply.ends_with(b"> ") || rule.reply.ends_with(b">") {
                self.awaiting_payload = true;
            }
            self.rx.extend(rule.reply.iter().copied());
        }
        self.lines.push(line);
    }
}

impl SerialChannel for SimRadio {
    fn write(&mut self, bytes: &[u8]) {
        self.written.extend_from_slice(bytes);

        if self.awaiting_payload && bytes.len() == 1 {
            self.awaiting_payload = false;
            self.payloads.push(bytes[0]);
            let reply = self.payload_reply.clone();
            self.rx.extend(reply);
            return;
        }

        for &b in bytes {
            self.partial.push(b);
            if self.partial.ends_with(b"\r\n") {
                let len = self.partial.len() - 2;
                let line = String::from_utf8_lossy(&self.partial[..len]).into_owned();
                self.partial.clear();
                self.on_line(line);
            }
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}
