//! A terminal emulator focused on making rich text (HTML) output work
//! well, even at the expense of support for interactive terminal
//! applications.
//!
//! It behaves like a terminal with a single line of output and an
//! infinitely deep scrollback buffer. Attempts to move the cursor to an
//! absolute row silently degrade to column movement. When it observes an
//! application requesting full-screen mode it stops running so the
//! embedder can upgrade to a full-featured terminal emulator.

pub mod handlers;
pub mod parser;
mod render;
mod screen;
mod types;

pub use screen::Screen;
pub use types::{Color, Node, StyleAttributes, StyleFlags};

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;

use handlers::ScreenHandler;
use parser::{Parser, ParserError};

/// The terminal façade: wires a parser over a byte source to the screen.
///
/// There are effectively two nested state machines: the parser, which
/// reads bytes from the source and fires dispatch events on escape
/// sequences, and the handler, which advances the screen on those events.
pub struct RichTextTerminal<R: Read> {
    parser: Parser<R>,
    handler: ScreenHandler,
    screen: Arc<Mutex<Screen>>,
}

impl<R: Read> RichTextTerminal<R> {
    pub fn new(src: R) -> Self {
        let screen = Arc::new(Mutex::new(Screen::new()));
        Self {
            parser: Parser::new(src),
            handler: ScreenHandler::new(Arc::clone(&screen)),
            screen,
        }
    }

    /// Register a one-shot callback fired when the child requests an
    /// alternate-screen mode. After it fires, [`run`](Self::run) returns
    /// and the embedder owns handing the byte source to a real emulator.
    pub fn with_upgrade_hook(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.handler.set_upgrade_hook(hook);
        self
    }

    /// Drive the parser until EOF, cancellation, an upgrade request, or a
    /// fatal error. Ordinary end-of-stream conditions (EOF, closed pipe,
    /// EIO from an orphaned pty) return `Ok`.
    pub fn run(&mut self, cancel: &AtomicBool) -> Result<(), ParserError> {
        loop {
            if self.handler.upgraded() {
                return Ok(());
            }
            if cancel.load(Ordering::Relaxed) {
                return Ok(());
            }

            match self.parser.step(&mut self.handler) {
                Ok(()) => {}
                Err(err) if err.is_quiet() => return Ok(()),
                Err(err) => {
                    error!(%err, "parser exited");
                    return Err(err);
                }
            }
        }
    }

    /// The rendered scrollback followed by the rendered active line.
    pub fn lines(&self) -> Vec<String> {
        self.screen.lock().lines()
    }

    /// Whether the child has requested full-screen mode.
    pub fn upgraded(&self) -> bool {
        self.handler.upgraded()
    }

    /// Snapshot access to the screen for embedders that want more than
    /// rendered lines.
    pub fn screen(&self) -> &Arc<Mutex<Screen>> {
        &self.screen
    }
}

#[cfg(test)]
mod tests;
