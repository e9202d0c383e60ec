//! AT transport tests

mod common;

use common::{ManualClock, SimRadio};
use wifi_remote_controller::config::RESPONSE_BUFFER_SIZE;
use wifi_remote_controller::hal::Clock;
use wifi_remote_controller::transport::{AtTransport, ResponseWindow};

fn transport() -> AtTransport<SimRadio, ManualClock> {
    AtTransport::new(SimRadio::new(), ManualClock::new())
}

#[test]
fn test_send_appends_crlf() {
    let mut t = transport();
    t.send("AT+CWMODE=1");

    assert_eq!(t.channel().written, b"AT+CWMODE=1\r\n");
    assert_eq!(t.channel().lines, vec!["AT+CWMODE=1".to_string()]);
}

#[test]
fn test_send_raw_has_no_framing() {
    let mut t = transport();
    t.send_raw(0x09);

    assert_eq!(t.channel().written, vec![0x09]);
}

#[test]
fn test_match_mid_stream() {
    let mut t = transport();
    t.channel_mut().inject(b"garbage...OKtrailing");

    assert!(t.await_response(b"OK", 1000));
    // Stops reading right after the marker
    assert_eq!(t.channel().pending_rx(), "trailing".len());
}

#[test]
fn test_match_without_line_boundary() {
    let mut t = transport();
    t.channel_mut().inject(b"\r\nOK\r\n> ");

    assert!(t.await_response(b">", 2000));
}

#[test]
fn test_timeout_when_marker_missing() {
    let mut t = transport();
    t.channel_mut().inject(b"ERROR\r\n");

    assert!(!t.await_response(b"OK", 1000));
    // Gave up once the full timeout elapsed
    assert!(t.clock().now_ms() >= 1000);
    assert!(t.clock().now_ms() <= 1001);
}

#[test]
fn test_timeout_yields_every_idle_poll() {
    let mut t = transport();

    assert!(!t.await_response(b"OK", 50));
    assert_eq!(t.clock().relaxes, 50);
}

#[test]
fn test_partial_marker_does_not_match() {
    let mut t = transport();
    t.channel_mut().inject(b"SEND O");

    assert!(!t.await_response(b"SEND OK", 100));
}

#[test]
fn test_empty_expected_matches_immediately() {
    let mut t = transport();

    assert!(t.await_response(b"", 5000));
    assert_eq!(t.clock().now_ms(), 0);
}

#[test]
fn test_marker_after_long_preamble() {
    let mut t = transport();
    let preamble = vec![b'x'; 4 * RESPONSE_BUFFER_SIZE];
    t.channel_mut().inject(&preamble);
    t.channel_mut().inject(b"SEND OK");

    assert!(t.await_response(b"SEND OK", 5000));
}

#[test]
fn test_marker_longer_than_window_never_matches() {
    let mut t = transport();
    let needle = vec![b'a'; RESPONSE_BUFFER_SIZE];
    t.channel_mut().inject(&needle);

    assert!(!t.await_response(&needle, 100));
}

#[test]
fn test_window_resets_between_exchanges() {
    let mut t = transport();
    t.channel_mut().inject(b"O");
    assert!(!t.await_response(b"OK", 10));

    // A stale 'O' from the previous exchange must not complete a new match
    t.channel_mut().inject(b"K");
    assert!(!t.await_response(b"OK", 10));
}

#[test]
fn test_window_capacity() {
    let mut w = ResponseWindow::<RESPONSE_BUFFER_SIZE>::new();
    for i in 0..1000u32 {
        w.push((i % 251) as u8);
    }
    assert_eq!(w.len(), RESPONSE_BUFFER_SIZE - 1);
    // Most recent byte is last
    assert_eq!(*w.as_bytes().last().unwrap(), (999 % 251) as u8);
}

#[test]
fn test_send_discards_stale_reply() {
    let mut t = transport();
    t.channel_mut().inject(b"\r\nOK\r\n");

    // Nobody answers this one
    t.send("AT+CIPMUX=1");
    assert!(!t.await_response(b"OK", 100));
}

#[test]
fn test_drain_unsolicited() {
    let mut t = transport();
    t.channel_mut().inject(b"WIFI DISCONNECT\r\n");

    assert_eq!(t.drain_unsolicited(), 17);
    assert_eq!(t.channel().pending_rx(), 0);
    assert_eq!(t.drain_unsolicited(), 0);
}

#[test]
fn test_reply_kept_after_timeout() {
    let mut t = transport();
    t.channel_mut().inject(b"busy p...\r\nERROR\r\n");

    assert!(!t.await_response(b"OK", 100));
    assert_eq!(t.last_reply(), b"busy p...\r\nERROR\r\n");
}
