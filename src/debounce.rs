//! Module: debounce
//!
//! Purpose: Turn noisy push-button samples into stable press/release state.
//!
//! Architecture:
//! - `Debouncer` is owned by the sampling timer (single writer, never blocks)
//! - Stable state is published to a `ButtonBoard`: two atomic bytes, one
//!   stable bitmask and one changed bitmask
//! - Any context may read the board; `drain_events` has a single consumer
//!
//! ```text
//! pins ──▶ Debouncer::sample() ──▶ ButtonBoard ──▶ current_state() (transmit)
//!          (5 ms timer)            (atomics)   └─▶ drain_events()  (logging)
//! ```
//!
//! Algorithm (per button, per sample):
//! 1. raw differs from last raw: count = 0
//! 2. else count < cap: count += 1
//! 3. else raw != stable: stable = raw, changed = true
//!
//! Raw is always updated. A transition commits on the sample after the
//! count saturates, so contact bounce shorter than the window is absorbed.
//!
//! Safety: Safe. No unsafe blocks.

use core::sync::atomic::{AtomicU8, Ordering};

use embedded_hal::digital::InputPin;

use crate::config::NUM_BUTTONS;

/// Physical button line, in payload bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ButtonLine {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl ButtonLine {
    /// All lines, indexed by bit position.
    pub const ALL: [ButtonLine; NUM_BUTTONS] =
        [ButtonLine::Right, ButtonLine::Down, ButtonLine::Left, ButtonLine::Up];

    /// Bit index in the payload byte.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit mask in the payload byte.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            ButtonLine::Right => "RIGHT",
            ButtonLine::Down => "DOWN",
            ButtonLine::Left => "LEFT",
            ButtonLine::Up => "UP",
        }
    }
}

impl core::fmt::Display for ButtonLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical button state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    #[inline]
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ButtonState::Pressed => "pressed",
            ButtonState::Released => "released",
        }
    }
}

impl core::fmt::Display for ButtonState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of raw button samples.
pub trait ButtonInputs {
    /// Read the instantaneous state of one line.
    fn read(&mut self, line: ButtonLine) -> ButtonState;
}

/// Pulled-up input pins, one per line in `ButtonLine::ALL` order.
///
/// A low level reads as pressed. A pin that fails to read counts as
/// released; the debounce window absorbs the glitch.
pub struct PinInputs<P> {
    pins: [P; NUM_BUTTONS],
}

impl<P: InputPin> PinInputs<P> {
    pub fn new(pins: [P; NUM_BUTTONS]) -> Self {
        Self { pins }
    }
}

impl<P: InputPin> ButtonInputs for PinInputs<P> {
    fn read(&mut self, line: ButtonLine) -> ButtonState {
        match self.pins[line.index()].is_low() {
            Ok(true) => ButtonState::Pressed,
            _ => ButtonState::Released,
        }
    }
}

/// Debounce state of one button.
#[derive(Clone, Copy, Debug)]
pub struct Button {
    line: ButtonLine,
    raw_state: ButtonState,
    stable_state: ButtonState,
    consecutive_count: u8,
}

impl Button {
    /// Start settled in `initial`.
    pub fn new(line: ButtonLine, initial: ButtonState) -> Self {
        Self {
            line,
            raw_state: initial,
            stable_state: initial,
            consecutive_count: 0,
        }
    }

    /// Feed one raw sample. Returns `true` if the stable state changed.
    pub fn sample(&mut self, raw: ButtonState, cap: u8) -> bool {
        let mut committed = false;

        if raw != self.raw_state {
            // initial switch or bounce
            self.consecutive_count = 0;
        } else if self.consecutive_count < cap {
            self.consecutive_count += 1;
        } else if raw != self.stable_state {
            self.stable_state = raw;
            committed = true;
        }

        self.raw_state = raw;
        committed
    }

    pub fn line(&self) -> ButtonLine {
        self.line
    }

    pub fn raw_state(&self) -> ButtonState {
        self.raw_state
    }

    pub fn stable_state(&self) -> ButtonState {
        self.stable_state
    }

    pub fn consecutive_count(&self) -> u8 {
        self.consecutive_count
    }
}

/// A delivered stable-state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonEvent {
    pub line: ButtonLine,
    pub state: ButtonState,
}

/// Events taken from the board by one `drain_events` call.
#[derive(Clone, Debug)]
pub struct ButtonEvents {
    changed: u8,
    stable: u8,
    next: usize,
}

impl ButtonEvents {
    /// Changed mask captured by the drain.
    pub fn changed_mask(&self) -> u8 {
        self.changed
    }
}

impl Iterator for ButtonEvents {
    type Item = ButtonEvent;

    fn next(&mut self) -> Option<ButtonEvent> {
        while self.next < NUM_BUTTONS {
            let line = ButtonLine::ALL[self.next];
            self.next += 1;
            if self.changed & line.mask() != 0 {
                let state = if self.stable & line.mask() != 0 {
                    ButtonState::Pressed
                } else {
                    ButtonState::Released
                };
                return Some(ButtonEvent { line, state });
            }
        }
        None
    }
}

/// Published button state, shared between the sampling timer and the
/// main loop.
///
/// Single-word atomics: a reader never sees a torn mask.
pub struct ButtonBoard {
    stable: AtomicU8,
    changed: AtomicU8,
}

impl ButtonBoard {
    pub const fn new() -> Self {
        Self {
            stable: AtomicU8::new(0),
            changed: AtomicU8::new(0),
        }
    }

    /// Packed stable state: bit `line.index()` set when pressed.
    #[inline]
    pub fn current_state(&self) -> u8 {
        self.stable.load(Ordering::Acquire)
    }

    /// Take all pending transitions, clearing their changed flags.
    ///
    /// Each event carries the line's stable state at drain time.
    pub fn drain_events(&self) -> ButtonEvents {
        let changed = self.changed.swap(0, Ordering::AcqRel);
        ButtonEvents {
            changed,
            stable: self.current_state(),
            next: 0,
        }
    }

    /// Check for undelivered transitions without consuming them.
    #[inline]
    pub fn has_events(&self) -> bool {
        self.changed.load(Ordering::Acquire) != 0
    }

    fn reset(&self, stable: u8) {
        self.stable.store(stable, Ordering::Release);
        self.changed.store(0, Ordering::Release);
    }

    fn publish(&self, stable: u8, changed: u8) {
        self.stable.store(stable, Ordering::Release);
        self.changed.fetch_or(changed, Ordering::AcqRel);
    }
}

impl Default for ButtonBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounce engine for the controller's buttons.
pub struct Debouncer<'a, I> {
    buttons: [Button; NUM_BUTTONS],
    board: &'a ButtonBoard,
    inputs: I,
    cap: u8,
}

impl<'a, I: ButtonInputs> Debouncer<'a, I> {
    /// Create the engine, taking the initial state from the hardware.
    ///
    /// The board is reset to that state with no pending events.
    pub fn new(board: &'a ButtonBoard, mut inputs: I, cap: u8) -> Self {
        let buttons = ButtonLine::ALL.map(|line| Button::new(line, inputs.read(line)));
        let debouncer = Self {
            buttons,
            board,
            inputs,
            cap,
        };
        board.reset(debouncer.stable_mask());
        debouncer
    }

    /// Sample every line once. Call at a fixed period from one context only.
    pub fn sample(&mut self) {
        let mut changed = 0u8;

        for button in self.buttons.iter_mut() {
            let raw = self.inputs.read(button.line());
            if button.sample(raw, self.cap) {
                changed |= button.line().mask();
            }
        }

        if changed != 0 {
            self.board.publish(self.stable_mask(), changed);
        }
    }

    /// Packed stable state, see [`ButtonBoard::current_state`].
    pub fn current_state(&self) -> u8 {
        self.board.current_state()
    }

    /// See [`ButtonBoard::drain_events`].
    pub fn drain_events(&self) -> ButtonEvents {
        self.board.drain_events()
    }

    pub fn buttons(&self) -> &[Button; NUM_BUTTONS] {
        &self.buttons
    }

    pub fn button(&self, line: ButtonLine) -> &Button {
        &self.buttons[line.index()]
    }

    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.inputs
    }

    fn stable_mask(&self) -> u8 {
        self.buttons
            .iter()
            .filter(|b| b.stable_state().is_pressed())
            .fold(0, |mask, b| mask | b.line().mask())
    }
}
