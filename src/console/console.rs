//! Main console struct integrating all components

use core::fmt::Write;

use super::{execute, parse_line, ConsoleContext, ConsoleError, LineBuffer};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Prompt printed before every line
pub const PROMPT: &str = "> ";

/// Console state machine
pub struct Console {
    line: LineBuffer,
    /// Escape sequence state
    escape_state: EscapeState,
}

#[derive(Clone, Copy, PartialEq)]
enum EscapeState {
    Normal,
    Escape,  // Got ESC
    Bracket, // Got ESC [
}

impl Console {
    /// Create new console
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            escape_state: EscapeState::Normal,
        }
    }

    /// Process a single input byte
    ///
    /// Returns Some(result) if a command was executed, None otherwise.
    /// Escape sequences (arrow keys) are swallowed.
    pub fn process_byte(
        &mut self,
        byte: u8,
        ctx: &ConsoleContext<'_>,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>> {
        match self.escape_state {
            EscapeState::Normal => self.process_normal(byte, ctx, out),
            EscapeState::Escape => {
                self.escape_state = if byte == b'[' {
                    EscapeState::Bracket
                } else {
                    EscapeState::Normal
                };
                None
            }
            EscapeState::Bracket => {
                // Final byte of a CSI sequence is 0x40..=0x7E
                if (0x40..=0x7E).contains(&byte) {
                    self.escape_state = EscapeState::Normal;
                }
                None
            }
        }
    }

    fn process_normal(
        &mut self,
        byte: u8,
        ctx: &ConsoleContext<'_>,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>> {
        match byte {
            // Enter
            b'\r' | b'\n' => {
                let _ = writeln!(out);

                let result = if self.line.is_empty() {
                    None
                } else {
                    let cmd = parse_line(self.line.as_str());
                    let result = execute(&cmd, ctx, out);
                    if let Err(e) = result {
                        let _ = writeln!(out, "{}", e);
                    }
                    Some(result)
                };

                self.line.clear();
                self.print_prompt(out);
                result
            }

            // Backspace
            0x7F | 0x08 => {
                if self.line.backspace() {
                    // Echo: backspace, space, backspace
                    let _ = write!(out, "\x08 \x08");
                }
                None
            }

            // Escape
            0x1B => {
                self.escape_state = EscapeState::Escape;
                None
            }

            // Ctrl+C
            0x03 => {
                let _ = writeln!(out, "^C");
                self.line.clear();
                self.print_prompt(out);
                None
            }

            // Ctrl+U (clear line)
            0x15 => {
                for _ in 0..self.line.len() {
                    let _ = write!(out, "\x08 \x08");
                }
                self.line.clear();
                None
            }

            // Printable character
            0x20..=0x7E => {
                if self.line.push(byte) {
                    let _ = write!(out, "{}", byte as char);
                }
                None
            }

            _ => None,
        }
    }

    /// Current unfinished input.
    pub fn pending_line(&self) -> &str {
        self.line.as_str()
    }

    /// Print the prompt
    pub fn print_prompt(&self, out: &mut dyn Write) {
        let _ = write!(out, "{}", PROMPT);
    }

    /// Print welcome banner
    pub fn print_banner(&self, out: &mut dyn Write) {
        let _ = writeln!(out, "\r\n{}", VERSION);
        let _ = writeln!(out, "Type 'help' for commands.\r");
        self.print_prompt(out);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
