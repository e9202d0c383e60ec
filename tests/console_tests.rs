//! Console line editing tests

mod common;

use common::ScriptedInputs;
use wifi_remote_controller::console::{Console, ConsoleContext, ConsoleError, PROMPT};
use wifi_remote_controller::debounce::{ButtonBoard, ButtonLine, ButtonState, Debouncer};
use wifi_remote_controller::link::LinkStatus;

fn feed(console: &mut Console, input: &[u8], ctx: &ConsoleContext<'_>) -> (Vec<Result<(), ConsoleError>>, String) {
    let mut out = String::new();
    let mut results = Vec::new();
    for &b in input {
        if let Some(r) = console.process_byte(b, ctx, &mut out) {
            results.push(r);
        }
    }
    (results, out)
}

#[test]
fn test_echo_and_execute() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    let (results, out) = feed(&mut console, b"start\r", &ctx);

    assert_eq!(results, vec![Ok(())]);
    assert!(out.starts_with("start\n"));
    assert!(out.ends_with(PROMPT));
    assert!(link.is_started());
}

#[test]
fn test_crlf_runs_command_once() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    // LF after CR is an empty line
    let (results, _) = feed(&mut console, b"start\r\n", &ctx);
    assert_eq!(results.len(), 1);
}

#[test]
fn test_error_is_printed() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    let (results, out) = feed(&mut console, b"launch\r", &ctx);

    assert_eq!(results, vec![Err(ConsoleError::UnknownCommand)]);
    assert!(out.contains("E01: unknown command"));
}

#[test]
fn test_backspace_edits_line() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    let (_, out) = feed(&mut console, b"startx\x7f", &ctx);
    assert_eq!(console.pending_line(), "start");
    assert!(out.ends_with("\x08 \x08"));

    let (results, _) = feed(&mut console, b"\r", &ctx);
    assert_eq!(results, vec![Ok(())]);
}

#[test]
fn test_backspace_on_empty_line_is_silent() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    let (_, out) = feed(&mut console, b"\x08\x08", &ctx);
    assert_eq!(out, "");
}

#[test]
fn test_ctrl_c_discards_line() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    let (results, out) = feed(&mut console, b"start\x03\r", &ctx);

    assert!(results.is_empty());
    assert!(out.contains("^C"));
    assert!(!link.is_started());
}

#[test]
fn test_ctrl_u_clears_line() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    feed(&mut console, b"stat\x15", &ctx);
    assert_eq!(console.pending_line(), "");

    let (results, _) = feed(&mut console, b"version\r", &ctx);
    assert_eq!(results, vec![Ok(())]);
}

#[test]
fn test_arrow_keys_are_swallowed() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();

    feed(&mut console, b"sta\x1b[Art", &ctx);
    assert_eq!(console.pending_line(), "start");
}

#[test]
fn test_buttons_command_shows_pressed_lines() {
    let (buttons, link) = (ButtonBoard::new(), LinkStatus::new());
    let mut debouncer = Debouncer::new(&buttons, ScriptedInputs::released(), 5);
    debouncer.inputs_mut().set(ButtonLine::Right, ButtonState::Pressed);
    debouncer.inputs_mut().set(ButtonLine::Up, ButtonState::Pressed);
    for _ in 0..7 {
        debouncer.sample();
    }

    let ctx = ConsoleContext { buttons: &buttons, link: &link };
    let mut console = Console::new();
    let (_, out) = feed(&mut console, b"buttons\r", &ctx);

    assert!(out.contains("0b1001 RIGHT UP\n"));
}

#[test]
fn test_banner_ends_with_prompt() {
    let console = Console::new();
    let mut out = String::new();
    console.print_banner(&mut out);

    assert!(out.contains("help"));
    assert!(out.ends_with(PROMPT));
}
