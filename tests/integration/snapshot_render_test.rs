//! Snapshot tests for rendered HTML output.

use std::io::Cursor;
use std::sync::atomic::AtomicBool;

use rtt::RichTextTerminal;

/// Feed a byte stream and join the rendered lines for snapshotting.
fn render(input: &[u8]) -> String {
    let mut term = RichTextTerminal::new(Cursor::new(input.to_vec()));
    term.run(&AtomicBool::new(false)).expect("run failed");
    term.lines().join("\n")
}

#[test]
fn snapshot_plain_ascii() {
    insta::assert_snapshot!(render(b"Hello"), @"Hello");
}

#[test]
fn snapshot_red_foreground() {
    insta::assert_snapshot!(
        render(b"\x1b[31mRed\x1b[39mPlain"),
        @r#"<span style="color:#800000;">Red</span>Plain"#
    );
}

#[test]
fn snapshot_bold_hyperlink() {
    insta::assert_snapshot!(
        render(b"\x1b]8;;https://x/\x1b\\\x1b[1mHi\x1b[21m\x1b]8;;\x1b\\."),
        @r#"<a href="https://x/"><span style="font-weight:bold;">Hi</span></a>."#
    );
}

#[test]
fn snapshot_direct_color() {
    insta::assert_snapshot!(
        render(b"\x1b[38;2;10;20;30mX"),
        @r#"<span style="color:#0a141e;">X</span>"#
    );
}

#[test]
fn snapshot_escaped_markup_characters() {
    insta::assert_snapshot!(
        render(b"if a < b && b > c { \"quote\" }"),
        @"if a &lt; b &amp;&amp; b &gt; c { &quot;quote&quot; }"
    );
}

#[test]
fn snapshot_shell_session() {
    insta::assert_snapshot!(
        render(b"$ ls\r\n\x1b[1;34mdocs\x1b[0m  README.md\r\n$ exit"),
        @r#"
    $ ls
    <span style="font-weight:bold;color:#000080;">docs</span>  README.md
    $ exit
    "#
    );
}
