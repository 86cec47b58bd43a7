//! Terminal data types.
//!
//! Contains the core data structures for representing screen contents:
//! - Color: indexed (256-color palette) and direct (RGB) colors
//! - StyleFlags: text attributes (bold, italic, underline, etc.)
//! - StyleAttributes: the shared attribute bundle every cell references
//! - Node: a single character with its attribute bundle

use std::sync::Arc;

use bitflags::bitflags;

/// A terminal color. The default foreground/background is not a color
/// value; fields that can be defaulted hold an `Option<Color>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// One of the 256 palette entries (0-7 standard, 8-15 bright,
    /// 16-231 the 6x6x6 cube, 232-255 the grayscale ramp).
    Indexed(u8),
    /// Direct color.
    Rgb(u8, u8, u8),
}

/// The 16 base palette entries, as xterm defines them.
const BASE_PALETTE: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00),
    (0x80, 0x00, 0x00),
    (0x00, 0x80, 0x00),
    (0x80, 0x80, 0x00),
    (0x00, 0x00, 0x80),
    (0x80, 0x00, 0x80),
    (0x00, 0x80, 0x80),
    (0xc0, 0xc0, 0xc0),
    (0x80, 0x80, 0x80),
    (0xff, 0x00, 0x00),
    (0x00, 0xff, 0x00),
    (0xff, 0xff, 0x00),
    (0x00, 0x00, 0xff),
    (0xff, 0x00, 0xff),
    (0x00, 0xff, 0xff),
    (0xff, 0xff, 0xff),
];

impl Color {
    /// Resolve to RGB components through the standard palette.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Indexed(i) => palette(i),
        }
    }

    /// The `#rrggbb` form used in rendered markup.
    pub fn html_color_code(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

fn palette(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => BASE_PALETTE[index as usize],
        16..=231 => {
            let n = index - 16;
            // Cube component levels: 0, 95, 135, 175, 215, 255.
            let level = |v: u8| if v == 0 { 0 } else { 55 + 40 * v };
            (level(n / 36), level((n / 6) % 6), level(n % 6))
        }
        232..=255 => {
            let v = 8 + 10 * (index - 232);
            (v, v, v)
        }
    }
}

bitflags! {
    /// Text style attributes. Superscript and Subscript are kept mutually
    /// exclusive by the SGR dispatch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleFlags: u32 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERTED = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
        const DOUBLE_UNDERLINE = 1 << 8;
        const SUPERSCRIPT = 1 << 9;
        const SUBSCRIPT = 1 << 10;
    }
}

/// The attribute bundle applied to every cell written while it is active.
///
/// Bundles are shared between many nodes through an `Arc` and are never
/// mutated once a node references them; the screen redirects its active
/// bundle to a fresh copy before changing anything (`Arc::make_mut`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleAttributes {
    pub flags: StyleFlags,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub underline: Option<Color>,
    pub uri: String,
}

impl StyleAttributes {
    /// Whether this bundle equals the all-defaults bundle.
    pub fn is_empty(&self) -> bool {
        *self == StyleAttributes::default()
    }

    pub fn has_style(&self, flags: StyleFlags) -> bool {
        self.flags.intersects(flags)
    }
}

/// A single displayed cell.
#[derive(Debug, Clone)]
pub struct Node {
    pub rune: char,
    pub attrs: Arc<StyleAttributes>,
}

impl Node {
    pub(crate) fn new(rune: char, attrs: &Arc<StyleAttributes>) -> Self {
        Self {
            rune,
            attrs: Arc::clone(attrs),
        }
    }
}
