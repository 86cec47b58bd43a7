//! End-to-end terminal tests: byte stream in, rendered HTML lines out.

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rtt::RichTextTerminal;

/// Feed a complete byte stream through a terminal and return it.
fn feed(input: &[u8]) -> RichTextTerminal<Cursor<Vec<u8>>> {
    let mut term = RichTextTerminal::new(Cursor::new(input.to_vec()));
    term.run(&AtomicBool::new(false)).expect("run failed");
    term
}

#[test]
fn empty_stream_renders_one_empty_line() {
    assert_eq!(feed(b"").lines(), vec![String::new()]);
}

#[test]
fn plain_ascii_stays_on_the_active_line() {
    assert_eq!(feed(b"Hello").lines(), vec!["Hello".to_string()]);
}

#[test]
fn newline_completes_a_scrollback_line() {
    assert_eq!(
        feed(b"Hello\n").lines(),
        vec!["Hello".to_string(), String::new()]
    );
}

#[test]
fn crlf_shell_output() {
    assert_eq!(
        feed(b"$ echo hi\r\nhi\r\n$ ").lines(),
        vec!["$ echo hi".to_string(), "hi".to_string(), "$ ".to_string()]
    );
}

#[test]
fn red_foreground_renders_a_span() {
    assert_eq!(
        feed(b"\x1b[31mRed\x1b[39mPlain").lines(),
        vec!["<span style=\"color:#800000;\">Red</span>Plain".to_string()]
    );
}

#[test]
fn bold_hyperlink_nests_span_inside_anchor() {
    assert_eq!(
        feed(b"\x1b]8;;https://x/\x1b\\\x1b[1mHi\x1b[21m\x1b]8;;\x1b\\.").lines(),
        vec![
            "<a href=\"https://x/\"><span style=\"font-weight:bold;\">Hi</span></a>.".to_string()
        ]
    );
}

#[test]
fn direct_color_renders_component_hex() {
    assert_eq!(
        feed(b"\x1b[38;2;10;20;30mX").lines(),
        vec!["<span style=\"color:#0a141e;\">X</span>".to_string()]
    );
}

#[test]
fn erase_right_truncates_at_the_cursor() {
    assert_eq!(
        feed(b"ABCDE\x1b[2D\x1b[0K").lines(),
        vec!["ABC".to_string()]
    );
}

#[test]
fn sgr_without_params_resets() {
    assert_eq!(
        feed(b"\x1b[31mRed\x1b[mPlain").lines(),
        vec!["<span style=\"color:#800000;\">Red</span>Plain".to_string()]
    );
}

#[test]
fn full_reset_starts_a_fresh_line() {
    assert_eq!(
        feed(b"\x1b[1mloud\x1bcquiet").lines(),
        vec![
            "<span style=\"font-weight:bold;\">loud</span>".to_string(),
            "quiet".to_string()
        ]
    );
}

#[test]
fn cursor_movement_overwrites_in_place() {
    assert_eq!(
        feed(b"Hallo\r\x1b[1Ce").lines(),
        vec!["Hello".to_string()]
    );
}

#[test]
fn unknown_sequences_are_ignored() {
    assert_eq!(
        feed(b"a\x1b[5Zb\x1b]999;x\x07c\x1bPq-\x1b\\d").lines(),
        vec!["abcd".to_string()]
    );
}

#[test]
fn upgrade_hook_fires_once_and_run_returns() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);

    let mut term = RichTextTerminal::new(Cursor::new(b"before\x1b[?1049hafter".to_vec()))
        .with_upgrade_hook(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    term.run(&AtomicBool::new(false)).expect("run failed");

    assert!(term.upgraded());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    // Run exits right after the triggering dispatch; "after" is never
    // parsed.
    assert_eq!(term.lines(), vec!["before".to_string()]);
}

#[test]
fn legacy_alternate_screen_also_upgrades() {
    let mut term = RichTextTerminal::new(Cursor::new(b"\x1b[?47h".to_vec()));
    term.run(&AtomicBool::new(false)).expect("run failed");
    assert!(term.upgraded());
}

#[test]
fn cancellation_stops_the_run_loop() {
    let mut term = RichTextTerminal::new(Cursor::new(b"never read".to_vec()));
    let cancel = AtomicBool::new(true);
    term.run(&cancel).expect("run failed");
    assert_eq!(term.lines(), vec![String::new()]);
}

#[test]
fn byte_at_a_time_feeding_matches_all_at_once() {
    struct OneByte(Cursor<Vec<u8>>);
    impl Read for OneByte {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            self.0.read(&mut buf[..1])
        }
    }

    let input: &[u8] =
        b"\x1b[1;4mtitle\x1b[0m\r\n\x1b]8;;https://x/\x07link\x1b]8;;\x07 \x1b[38;5;28mok\x1b[39m\ntail";

    let whole = feed(input).lines();

    let mut term = RichTextTerminal::new(OneByte(Cursor::new(input.to_vec())));
    term.run(&AtomicBool::new(false)).expect("run failed");

    assert_eq!(whole, term.lines());
}
