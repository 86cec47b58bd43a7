//! SGR (Select Graphic Rendition) handling: CSI m sequences for text
//! styling, including 256-color and RGB color forms.

use super::ScreenHandler;
use crate::terminal::screen::Screen;
use crate::terminal::types::{Color, StyleFlags};

impl ScreenHandler {
    /// Consume SGR parameters greedily from the left until exhausted.
    pub(crate) fn apply_sgr(&mut self, params: &[i64]) {
        let mut screen = self.screen.lock();
        let mut rest = params;
        while !rest.is_empty() {
            let handled = sgr_step(&mut screen, rest);
            rest = &rest[handled..];
        }
    }
}

/// Apply the leading parameter, returning how many parameters it consumed.
fn sgr_step(screen: &mut Screen, params: &[i64]) -> usize {
    match params[0] {
        0 => screen.reset_attributes(),
        1 => screen.set_style(StyleFlags::BOLD),
        2 => screen.set_style(StyleFlags::DIM),
        3 => screen.set_style(StyleFlags::ITALIC),
        4 => screen.set_style(StyleFlags::UNDERLINE),
        5 | 6 => screen.set_style(StyleFlags::BLINK),
        7 => screen.set_style(StyleFlags::INVERTED),
        8 => screen.set_style(StyleFlags::HIDDEN),
        9 => screen.set_style(StyleFlags::STRIKETHROUGH),
        21 => screen.reset_style(StyleFlags::BOLD),
        22 => screen.reset_style(StyleFlags::DIM),
        23 => screen.reset_style(StyleFlags::ITALIC),
        24 => screen.reset_style(StyleFlags::UNDERLINE),
        25 => screen.reset_style(StyleFlags::BLINK),
        27 => screen.reset_style(StyleFlags::INVERTED),
        28 => screen.reset_style(StyleFlags::HIDDEN),
        29 => screen.reset_style(StyleFlags::STRIKETHROUGH),
        n @ 30..=37 => screen.set_fg(Color::Indexed((n - 30) as u8)),
        38 => return extended_color(screen, params, true),
        39 => screen.reset_fg(),
        n @ 40..=47 => screen.set_bg(Color::Indexed((n - 40) as u8)),
        48 => return extended_color(screen, params, false),
        49 => screen.reset_bg(),
        73 => {
            screen.set_style(StyleFlags::SUPERSCRIPT);
            screen.reset_style(StyleFlags::SUBSCRIPT);
        }
        74 => {
            screen.set_style(StyleFlags::SUBSCRIPT);
            screen.reset_style(StyleFlags::SUPERSCRIPT);
        }
        75 => screen.reset_style(StyleFlags::SUPERSCRIPT | StyleFlags::SUBSCRIPT),
        n @ 90..=97 => screen.set_fg(Color::Indexed((n - 90 + 8) as u8)),
        n @ 100..=107 => screen.set_bg(Color::Indexed((n - 100 + 8) as u8)),
        _ => {}
    }
    1
}

/// Extended color after a 38 or 48: `5;n` selects a palette entry,
/// `2;r;g;b` a direct color. Anything else consumes only the introducer.
fn extended_color(screen: &mut Screen, params: &[i64], foreground: bool) -> usize {
    if params.len() >= 5 && params[1] == 2 {
        let color = Color::Rgb(params[2] as u8, params[3] as u8, params[4] as u8);
        if foreground {
            screen.set_fg(color);
        } else {
            screen.set_bg(color);
        }
        return 5;
    }
    if params.len() >= 3 && params[1] == 5 {
        let color = Color::Indexed(params[2] as u8);
        if foreground {
            screen.set_fg(color);
        } else {
            screen.set_bg(color);
        }
        return 3;
    }
    1
}
