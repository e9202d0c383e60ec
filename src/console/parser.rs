//! Command line parser
//!
//! Split on whitespace, max 2 arguments; extra tokens are ignored.

/// Maximum number of arguments kept per command.
pub const MAX_ARGS: usize = 2;

/// Parsed command with up to `MAX_ARGS` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    /// The command name (first token)
    pub command: &'a str,
    pub args: [Option<&'a str>; MAX_ARGS],
}

impl<'a> ParsedCommand<'a> {
    pub const fn empty() -> Self {
        Self {
            command: "",
            args: [None; MAX_ARGS],
        }
    }

    /// Get argument by index (0-based)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.args.get(idx).copied().flatten()
    }
}

/// Parse a command line into command and arguments
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let mut parts = line.split_whitespace();

    let command = parts.next().unwrap_or("");

    let mut args = [None; MAX_ARGS];
    for (slot, arg) in args.iter_mut().zip(parts) {
        *slot = Some(arg);
    }

    ParsedCommand { command, args }
}
