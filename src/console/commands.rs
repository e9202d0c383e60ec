//! Command handlers

use core::fmt::Write;

use super::console::VERSION;
use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::debounce::{ButtonBoard, ButtonLine};
use crate::link::LinkStatus;
use crate::logging::{self, LogLevel};

/// Shared state the commands read and act on.
pub struct ConsoleContext<'a> {
    pub buttons: &'a ButtonBoard,
    pub link: &'a LinkStatus,
}

/// Command handler signature
pub type Handler =
    fn(&ParsedCommand<'_>, &ConsoleContext<'_>, &mut dyn Write) -> Result<(), ConsoleError>;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub handler: Handler,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "start", brief: "Begin network setup", handler: cmd_start },
    CommandDescriptor { name: "status", brief: "Link session and counters", handler: cmd_status },
    CommandDescriptor { name: "buttons", brief: "Debounced button state", handler: cmd_buttons },
    CommandDescriptor { name: "debug", brief: "Debug logging on|off", handler: cmd_debug },
    CommandDescriptor { name: "version", brief: "Firmware version", handler: cmd_version },
];

/// Execute a parsed command
pub fn execute(
    cmd: &ParsedCommand<'_>,
    ctx: &ConsoleContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if cmd.command.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    let handler = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, ctx, out)
}

// --- Command Implementations ---

fn cmd_help(
    cmd: &ParsedCommand<'_>,
    _ctx: &ConsoleContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, "{}: {}", c.name, c.brief);
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  {:<10} {}", c.name, c.brief);
        }
    }
    Ok(())
}

fn cmd_start(
    _cmd: &ParsedCommand<'_>,
    ctx: &ConsoleContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if !ctx.link.mark_started() {
        return Err(ConsoleError::AlreadyStarted);
    }
    let _ = writeln!(out, "starting network setup");
    Ok(())
}

fn cmd_status(
    _cmd: &ParsedCommand<'_>,
    ctx: &ConsoleContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let snap = ctx.link.snapshot();

    let _ = writeln!(out, "session:     {}", snap.session);
    let _ = writeln!(out, "started:     {}", if snap.started { "yes" } else { "no" });
    let _ = writeln!(out, "attempts:    {}", snap.attempts);
    let _ = writeln!(out, "sent:        {}", snap.sent);
    let _ = writeln!(out, "not armed:   {}", snap.not_armed);
    let _ = writeln!(out, "unconfirmed: {}", snap.unconfirmed);
    Ok(())
}

fn cmd_buttons(
    _cmd: &ParsedCommand<'_>,
    ctx: &ConsoleContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let state = ctx.buttons.current_state();

    let _ = write!(out, "{:#06b}", state);
    if state == 0 {
        let _ = write!(out, " none");
    }
    for line in ButtonLine::ALL {
        if state & line.mask() != 0 {
            let _ = write!(out, " {}", line);
        }
    }
    let _ = writeln!(out);
    Ok(())
}

fn cmd_debug(
    cmd: &ParsedCommand<'_>,
    _ctx: &ConsoleContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let level = match cmd.arg(0).ok_or(ConsoleError::MissingArg)? {
        "on" => LogLevel::Debug,
        "off" => LogLevel::Info,
        _ => return Err(ConsoleError::InvalidValue),
    };

    logging::set_max_level(level);
    let _ = writeln!(out, "log level: {}", logging::max_level().as_str());
    Ok(())
}

fn cmd_version(
    _cmd: &ParsedCommand<'_>,
    _ctx: &ConsoleContext<'_>,
    out: &mut dyn Write,
) -> Result<(), ConsoleError> {
    let _ = writeln!(out, "{}", VERSION);
    Ok(())
}
