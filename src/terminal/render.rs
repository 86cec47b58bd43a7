//! HTML serialization of screen lines.
//!
//! Adjacent cells share one element as long as their attribute bundles are
//! identical (pointer-equal or value-equal). A change of bundle closes the
//! open span and anchor and opens fresh ones for the new bundle.

use std::sync::Arc;

use super::screen::Screen;
use super::types::{Node, StyleAttributes, StyleFlags};

fn push_escaped(out: &mut String, r: char) {
    match r {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(r),
    }
}

fn push_escaped_str(out: &mut String, s: &str) {
    for r in s.chars() {
        push_escaped(out, r);
    }
}

fn attrs_equal(a: &Arc<StyleAttributes>, b: &Arc<StyleAttributes>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

fn open_tags(out: &mut String, attrs: &StyleAttributes) {
    if !attrs.uri.is_empty() {
        out.push_str("<a href=\"");
        push_escaped_str(out, &attrs.uri);
        out.push_str("\">");
    }
    if !attrs.is_empty() {
        out.push_str("<span style=\"");
        if attrs.has_style(StyleFlags::BOLD) {
            out.push_str("font-weight:bold;");
        }
        if attrs.has_style(StyleFlags::ITALIC) {
            out.push_str("font-style:italic;");
        }
        if attrs.has_style(StyleFlags::UNDERLINE) {
            out.push_str("text-decoration:underline;");
        }
        if attrs.has_style(StyleFlags::HIDDEN) {
            out.push_str("visibility:hidden;");
        }
        if let Some(fg) = attrs.fg {
            out.push_str("color:");
            out.push_str(&fg.html_color_code());
            out.push(';');
        }
        if let Some(bg) = attrs.bg {
            out.push_str("background-color:");
            out.push_str(&bg.html_color_code());
            out.push(';');
        }
        out.push_str("\">");
    }
}

fn close_tags(out: &mut String, attrs: &StyleAttributes) {
    if !attrs.is_empty() {
        out.push_str("</span>");
    }
    if !attrs.uri.is_empty() {
        out.push_str("</a>");
    }
}

pub(crate) fn render_line(line: &[Node]) -> String {
    let mut raw = String::new();

    let defaults = Arc::new(StyleAttributes::default());
    let mut prev = &defaults;
    for node in line {
        if !attrs_equal(&node.attrs, prev) {
            close_tags(&mut raw, prev);
            open_tags(&mut raw, &node.attrs);
            prev = &node.attrs;
        }
        push_escaped(&mut raw, node.rune);
    }
    close_tags(&mut raw, prev);

    raw
}

impl Screen {
    /// Render the scrollback followed by the active line.
    pub fn lines(&self) -> Vec<String> {
        let mut ret = Vec::with_capacity(self.scrollback().len() + 1);
        for line in self.scrollback() {
            ret.push(render_line(line));
        }
        ret.push(render_line(self.active_line()));
        ret
    }
}
