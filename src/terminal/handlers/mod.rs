//! Dispatch-event handlers: callbacks from the parser which update the
//! screen.
//!
//! Split by sequence category:
//! - csi: cursor movement, erasing, modes
//! - style: SGR (Select Graphic Rendition) for colors and attributes
//! - osc: operating-system commands (hyperlinks, recognized tags)

mod csi;
mod osc;
mod style;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::parser::{Dispatch, DispatchError};
use super::screen::Screen;
use crate::ascii;

/// Log an unhandled CSI sequence for debugging.
fn log_unhandled_csi(final_byte: u8, params: &[String], intermediates: &str) {
    trace!(
        final_byte = %char::from(final_byte),
        params = ?params,
        intermediates = %intermediates,
        "unhandled CSI sequence"
    );
}

/// Log an unhandled ESC sequence for debugging.
fn log_unhandled_esc(final_byte: u8, intermediates: &str) {
    trace!(
        final_byte = %char::from(final_byte),
        intermediates = %intermediates,
        "unhandled ESC sequence"
    );
}

/// Log an unrecognized OSC tag for debugging.
fn log_unhandled_osc(params: &[String]) {
    trace!(params = ?params, "unhandled OSC command");
}

/// Translates dispatch events into screen mutations and tracks the
/// full-screen upgrade request.
pub struct ScreenHandler {
    screen: Arc<Mutex<Screen>>,

    upgraded: bool,
    upgrade_hook: Option<Box<dyn FnOnce() + Send>>,
}

impl ScreenHandler {
    pub fn new(screen: Arc<Mutex<Screen>>) -> Self {
        Self {
            screen,
            upgraded: false,
            upgrade_hook: None,
        }
    }

    pub fn set_upgrade_hook(&mut self, hook: impl FnOnce() + Send + 'static) {
        self.upgrade_hook = Some(Box::new(hook));
    }

    pub fn upgraded(&self) -> bool {
        self.upgraded
    }

    /// The child asked for an alternate-screen mode this terminal does not
    /// emulate; flag it and fire the one-shot hook.
    pub(crate) fn upgrade(&mut self) {
        if !self.upgraded {
            debug!("full-screen mode requested, deferring to a real terminal emulator");
        }
        self.upgraded = true;
        if let Some(hook) = self.upgrade_hook.take() {
            hook();
        }
    }
}

impl Dispatch for ScreenHandler {
    fn print_rune(&mut self, r: char) {
        self.screen.lock().print(r);
    }

    fn handle_ctrl(&mut self, c: u8) {
        match c {
            ascii::TAB => self.print_rune('\t'),
            ascii::BEL => {}
            ascii::BS => self.screen.lock().left(1),
            ascii::DEL => self.screen.lock().backspace(),
            ascii::CR => self.screen.lock().cr(),
            ascii::LF | ascii::FF | ascii::VT | ascii::NEL => self.screen.lock().newline(),
            _ => {}
        }
    }

    fn handle_esc(&mut self, intermediates: &str, final_byte: u8) {
        if intermediates.is_empty() && final_byte == b'c' {
            // Full Reset (RIS)
            let mut screen = self.screen.lock();
            screen.newline();
            screen.reset_attributes();
        } else {
            log_unhandled_esc(final_byte, intermediates);
        }
    }

    fn handle_csi(
        &mut self,
        params: &[String],
        intermediates: &str,
        final_byte: u8,
    ) -> Result<(), DispatchError> {
        self.dispatch_csi(params, intermediates, final_byte)
    }

    fn handle_osc(&mut self, params: &[String]) {
        self.dispatch_osc(params);
    }

    fn handle_dcs(&mut self, _params: &[String], _intermediates: &str, _final_byte: u8) {}
}
