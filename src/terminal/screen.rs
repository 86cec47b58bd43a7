//! The screen model: an infinitely deep scrollback of completed lines plus
//! the single line currently being written.
//!
//! There is no bounded height and no second dimension; vertical cursor
//! movement degenerates to newlines and the column index. Every write picks
//! up the active attribute bundle, which is mutated copy-on-write so cells
//! already on screen keep the bundle they were written with.

use std::sync::Arc;

use super::types::{Color, Node, StyleAttributes, StyleFlags};

#[derive(Debug, Default)]
pub struct Screen {
    scrollback: Vec<Vec<Node>>,

    active_line: Vec<Node>,
    pos: usize,

    active_attributes: Arc<StyleAttributes>,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scrollback(&self) -> &[Vec<Node>] {
        &self.scrollback
    }

    pub fn active_line(&self) -> &[Node] {
        &self.active_line
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn active_attributes(&self) -> &Arc<StyleAttributes> {
        &self.active_attributes
    }

    /// Write a rune at the cursor, overwriting in place when the cursor is
    /// inside the line and appending when it is at the end.
    pub fn print(&mut self, r: char) {
        let node = Node::new(r, &self.active_attributes);
        if self.pos < self.active_line.len() {
            self.active_line[self.pos] = node;
        } else {
            self.active_line.push(node);
        }
        self.pos += 1;
    }

    /// Remove the cell left of the cursor. No-op on an empty line or at
    /// column 0.
    pub fn backspace(&mut self) {
        if self.active_line.is_empty() || self.pos == 0 {
            return;
        }
        self.active_line.remove(self.pos - 1);
        self.pos -= 1;
    }

    pub fn newline(&mut self) {
        let line = std::mem::take(&mut self.active_line);
        self.scrollback.push(line);
        self.pos = 0;
    }

    pub fn newlines(&mut self, n: i64) {
        for _ in 0..n {
            self.newline();
        }
    }

    pub fn left(&mut self, n: i64) {
        self.set_pos(0, self.pos as i64 - n);
    }

    pub fn right(&mut self, n: i64) {
        self.set_pos(0, self.pos as i64 + n);
    }

    pub fn cr(&mut self) {
        self.pos = 0;
    }

    /// Move the cursor to column `y`. The row coordinate `x` is ignored in
    /// the single-line model. The line is padded with space cells carrying
    /// the active bundle until it reaches the target column.
    pub fn set_pos(&mut self, _x: i64, y: i64) {
        if y < 0 {
            self.pos = 0;
            return;
        }
        let y = y as usize;
        while self.active_line.len() < y {
            let pad = Node::new(' ', &self.active_attributes);
            self.active_line.push(pad);
        }
        self.pos = y;
    }

    pub fn clear(&mut self) {
        self.active_line.clear();
        self.pos = 0;
    }

    /// Replace everything left of the cursor with space cells carrying the
    /// active bundle.
    pub fn clear_left(&mut self) {
        let attrs = Arc::clone(&self.active_attributes);
        for node in &mut self.active_line[..self.pos] {
            *node = Node::new(' ', &attrs);
        }
    }

    /// Truncate the line at the cursor.
    pub fn clear_right(&mut self) {
        self.active_line.truncate(self.pos);
    }

    pub fn reset_attributes(&mut self) {
        self.active_attributes = Arc::new(StyleAttributes::default());
    }

    pub fn set_style(&mut self, flags: StyleFlags) {
        Arc::make_mut(&mut self.active_attributes).flags.insert(flags);
    }

    pub fn reset_style(&mut self, flags: StyleFlags) {
        Arc::make_mut(&mut self.active_attributes).flags.remove(flags);
    }

    pub fn set_fg(&mut self, color: Color) {
        Arc::make_mut(&mut self.active_attributes).fg = Some(color);
    }

    pub fn set_bg(&mut self, color: Color) {
        Arc::make_mut(&mut self.active_attributes).bg = Some(color);
    }

    pub fn reset_fg(&mut self) {
        Arc::make_mut(&mut self.active_attributes).fg = None;
    }

    pub fn reset_bg(&mut self) {
        Arc::make_mut(&mut self.active_attributes).bg = None;
    }

    pub fn set_uri(&mut self, uri: &str) {
        let attrs = Arc::make_mut(&mut self.active_attributes);
        attrs.uri.clear();
        attrs.uri.push_str(uri);
    }

    pub fn reset_uri(&mut self) {
        Arc::make_mut(&mut self.active_attributes).uri.clear();
    }
}
