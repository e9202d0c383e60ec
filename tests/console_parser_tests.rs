//! Parser tests for console command line parsing

use wifi_remote_controller::console::parser::{parse_line, ParsedCommand};

#[test]
fn test_parse_simple_command() {
    let cmd = parse_line("status");
    assert_eq!(cmd.command, "status");
    assert_eq!(cmd.args[0], None);
}

#[test]
fn test_parse_command_with_one_arg() {
    let cmd = parse_line("debug on");
    assert_eq!(cmd.command, "debug");
    assert_eq!(cmd.args[0], Some("on"));
    assert_eq!(cmd.args[1], None);
}

#[test]
fn test_parse_trims_whitespace() {
    let cmd = parse_line("  help   buttons  ");
    assert_eq!(cmd.command, "help");
    assert_eq!(cmd.arg(0), Some("buttons"));
}

#[test]
fn test_parse_empty_line() {
    let cmd = parse_line("");
    assert_eq!(cmd, ParsedCommand::empty());
}

#[test]
fn test_parse_max_args() {
    let cmd = parse_line("help debug on extra");
    assert_eq!(cmd.command, "help");
    assert_eq!(cmd.arg(0), Some("debug"));
    assert_eq!(cmd.arg(1), Some("on"));
    // "extra" is dropped (max 2 args)
    assert_eq!(cmd.arg(2), None);
}
