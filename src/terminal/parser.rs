//! Tokenizer for ANSI/VT100-style escape sequences.
//!
//! The parser pulls bytes from an `io::Read` source and pushes tokens to
//! the terminal through the callbacks on the [`Dispatch`] trait.
//!
//! See <https://vt100.net/emu/dec_ansi_parser> for the state and action
//! definitions this machine loosely tracks. 8-bit C1 controls and
//! Unicode-encoded C1 controls (U+0080 to U+009F) are not supported.

use std::io::{self, Read};

use thiserror::Error;
use tracing::debug;

use crate::ascii;

/// Callbacks a terminal emulator implements to consume dispatch events.
///
/// Parameters arrive as strings, possibly empty; numeric interpretation and
/// default substitution belong to the handler. The parameter slice passed
/// to `handle_csi` always holds at least one element.
pub trait Dispatch {
    fn print_rune(&mut self, r: char);
    fn handle_ctrl(&mut self, c: u8);
    fn handle_esc(&mut self, intermediates: &str, final_byte: u8);
    fn handle_csi(
        &mut self,
        params: &[String],
        intermediates: &str,
        final_byte: u8,
    ) -> Result<(), DispatchError>;
    fn handle_osc(&mut self, params: &[String]);
    fn handle_dcs(&mut self, params: &[String], intermediates: &str, final_byte: u8);
}

/// Contract violations a dispatch handler treats as fatal: the stream is
/// structurally invalid and parsing cannot continue safely.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("CSI handler received non-integer param {param:?}")]
    NonIntegerParam { param: String },

    #[error("CSI handler received an empty param slice")]
    EmptyParams,
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("parser is missing a transition on byte {byte:#04x} in state {state:?}")]
    UndefinedTransition { byte: u8, state: State },

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ParserError {
    /// Whether this error represents an ordinary end of stream: EOF, a
    /// closed pipe, or EIO from a pty whose child has exited.
    pub fn is_quiet(&self) -> bool {
        match self {
            ParserError::Io(err) => {
                matches!(
                    err.kind(),
                    io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe
                ) || err.raw_os_error() == Some(5)
            }
            _ => false,
        }
    }
}

/// Parser states. `Output` is the ground state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Output,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    OscString,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    IgnoreAll,
}

/// What a state handler tells the drive loop to do next.
enum Flow {
    /// Keep driving in the given state.
    Next(State),
    /// A dispatch event completed; return to the embedder in the given
    /// state.
    Pause(State),
}

fn is_ctrl_code(c: u8) -> bool {
    c <= 0x1f && !(c == ascii::CAN || c == ascii::SUB || c == ascii::ESC)
}

fn is_terminating_ctrl_code(c: u8) -> bool {
    c == ascii::CAN || c == ascii::SUB
}

fn is_graphical_code(c: u8) -> bool {
    c >= 0x20 // includes DEL (0x7f)
}

/// Single-byte-pushback reader over the raw source.
///
/// Reads one byte at a time and never prefetches, so no input is ever
/// buffered past an upgrade-triggering sequence. `consumed` tracks the net
/// number of bytes handed out, which the drive loop uses to detect states
/// that make no progress.
struct ByteReader<R: Read> {
    src: R,
    pushback: Option<u8>,
    consumed: u64,
}

impl<R: Read> ByteReader<R> {
    fn new(src: R) -> Self {
        Self {
            src,
            pushback: None,
            consumed: 0,
        }
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        if let Some(b) = self.pushback.take() {
            self.consumed += 1;
            return Ok(b);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.src.read(&mut buf) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(_) => {
                    self.consumed += 1;
                    return Ok(buf[0]);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    fn unread(&mut self, b: u8) {
        self.pushback = Some(b);
        self.consumed -= 1;
    }

    /// Decode one UTF-8 scalar, up to 4 bytes. Invalid encodings decode to
    /// U+FFFD without consuming the byte that broke the sequence.
    fn read_rune(&mut self) -> io::Result<char> {
        let b0 = self.read_byte()?;
        let len = match b0 {
            0x00..=0x7f => return Ok(b0 as char),
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Ok(char::REPLACEMENT_CHARACTER),
        };

        let mut buf = [b0, 0, 0, 0];
        for slot in buf.iter_mut().take(len).skip(1) {
            let b = self.read_byte()?;
            if b & 0xc0 != 0x80 {
                self.unread(b);
                return Ok(char::REPLACEMENT_CHARACTER);
            }
            *slot = b;
        }

        match std::str::from_utf8(&buf[..len]) {
            Ok(s) => Ok(s.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)),
            Err(_) => Ok(char::REPLACEMENT_CHARACTER),
        }
    }
}

pub struct Parser<R: Read> {
    reader: ByteReader<R>,
    state: State,

    partial_param: Vec<u8>,
    partial_params: Vec<String>,
    partial_intermediates: String,
}

impl<R: Read> Parser<R> {
    pub fn new(src: R) -> Self {
        Self {
            reader: ByteReader::new(src),
            state: State::Output,
            partial_param: Vec::new(),
            partial_params: Vec::new(),
            partial_intermediates: String::new(),
        }
    }

    /// Drive the state machine until the next dispatch event completes.
    /// (For the most part: extra `handle_ctrl`s might get delivered first.)
    ///
    /// Common transitions are checked on every byte before the current
    /// state runs; a byte the state refuses twice without consuming any
    /// input is an undefined transition.
    pub fn step<H: Dispatch>(&mut self, handler: &mut H) -> Result<(), ParserError> {
        let mut last_state: Option<State> = None;
        let mut mark = self.reader.consumed;

        loop {
            let before = self.reader.consumed;
            let c = self.reader.read_byte()?;

            if is_ctrl_code(c) {
                handler.handle_ctrl(c);
            } else if is_terminating_ctrl_code(c) {
                handler.handle_ctrl(c);
                return Ok(());
            } else if c == ascii::ESC {
                self.state = State::Escape;
                self.clear();
            } else if (0x80..0xc0).contains(&c) {
                // Not a valid UTF-8 leading byte; dropping it here avoids
                // an undefined transition in every state.
            } else {
                if last_state == Some(self.state) && before == mark {
                    return Err(ParserError::UndefinedTransition {
                        byte: c,
                        state: self.state,
                    });
                }
                self.reader.unread(c);
            }

            mark = self.reader.consumed;
            last_state = Some(self.state);

            match self.run_state(handler)? {
                Flow::Pause(next) => {
                    self.state = next;
                    return Ok(());
                }
                Flow::Next(next) => self.state = next,
            }
        }
    }

    fn run_state<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        match self.state {
            State::Output => self.output(handler),
            State::Escape => self.escape(handler),
            State::EscapeIntermediate => self.escape_intermediate(handler),
            State::CsiEntry => self.csi_entry(handler),
            State::CsiParam => self.csi_param(handler),
            State::CsiIntermediate => self.csi_intermediate(handler),
            State::CsiIgnore => self.csi_ignore(),
            State::OscString => self.osc_string(handler),
            State::DcsEntry => self.dcs_entry(),
            State::DcsParam => self.dcs_param(),
            State::DcsIntermediate => self.dcs_intermediate(),
            State::DcsPassthrough => self.dcs_passthrough(handler),
            State::IgnoreAll => self.ignore_all(),
        }
    }

    /// The ground state: decode and print runes.
    fn output<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        loop {
            let c = self.reader.read_byte()?;
            if c == ascii::DEL {
                handler.handle_ctrl(c);
                return Ok(Flow::Pause(State::Output));
            } else if is_graphical_code(c) {
                self.reader.unread(c);
                let r = self.reader.read_rune()?;
                handler.print_rune(r);
            } else {
                self.reader.unread(c);
                return Ok(Flow::Pause(State::Output));
            }
        }
    }

    /// Begin an escape sequence.
    fn escape<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        let c = self.reader.read_byte()?;
        let low = c & 0x7f;

        if c == ascii::DEL {
            return Ok(Flow::Next(State::Escape));
        }
        if (0x20..=0x2f).contains(&c) {
            self.clear();
            self.collect_intermediate(c);
            return Ok(Flow::Next(State::EscapeIntermediate));
        }
        match low {
            b'P' => return Ok(Flow::Next(State::DcsEntry)),
            b'[' => return Ok(Flow::Next(State::CsiEntry)),
            b']' => return Ok(Flow::Next(State::OscString)),
            // SOS, PM, APC
            b'X' | b'^' | b'_' => return Ok(Flow::Next(State::IgnoreAll)),
            // String Terminator (ST) is a no-op, no need to dispatch
            b'\\' => return Ok(Flow::Next(State::Output)),
            _ => {}
        }
        // ESC + [0x40-0x5F] is the 7-bit encoding of a C1 control code.
        if (0x40..=0x5f).contains(&c) {
            handler.handle_ctrl(c + 0x40);
            return Ok(Flow::Pause(State::Output));
        }
        // All other printable characters
        if (0x30..=0x7e).contains(&c) {
            handler.handle_esc("", c);
            return Ok(Flow::Pause(State::Output));
        }
        self.reader.unread(c);
        Ok(Flow::Next(State::Escape))
    }

    /// nF sequences: ESC followed by intermediates and a final byte.
    fn escape_intermediate<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        let c = self.reader.read_byte()?;
        match c {
            ascii::DEL => {}
            0x20..=0x2f => self.collect_intermediate(c),
            0x30..=0x7e => {
                let intermediates = self.partial_intermediates.clone();
                handler.handle_esc(&intermediates, c);
                return Ok(Flow::Pause(State::Output));
            }
            _ => self.reader.unread(c),
        }
        Ok(Flow::Next(State::EscapeIntermediate))
    }

    fn csi_entry<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        self.clear();

        let c = self.reader.read_byte()?;
        match c {
            ascii::DEL => {}
            0x20..=0x2f => {
                self.collect_intermediate(c);
                return Ok(Flow::Next(State::CsiIntermediate));
            }
            b'0'..=b'9' | b';' => {
                self.collect_param(c);
                return Ok(Flow::Next(State::CsiParam));
            }
            0x3c..=0x3f => {
                self.collect_intermediate(c);
                return Ok(Flow::Next(State::CsiParam));
            }
            0x3a => return Ok(Flow::Next(State::CsiIgnore)),
            0x40..=0x7e => {
                handler.handle_csi(&[String::new()], "", c)?;
                return Ok(Flow::Pause(State::Output));
            }
            _ => self.reader.unread(c),
        }
        Ok(Flow::Next(State::CsiEntry))
    }

    fn csi_param<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        loop {
            let c = self.reader.read_byte()?;
            match c {
                ascii::DEL => {}
                0x20..=0x2f => {
                    self.collect_intermediate(c);
                    return Ok(Flow::Next(State::CsiIntermediate));
                }
                b'0'..=b'9' | b';' => self.collect_param(c),
                0x3a | 0x3c..=0x3f => return Ok(Flow::Next(State::CsiIgnore)),
                0x40..=0x7e => {
                    self.dispatch_csi(handler, c)?;
                    return Ok(Flow::Pause(State::Output));
                }
                _ => {
                    self.reader.unread(c);
                    return Ok(Flow::Next(State::CsiParam));
                }
            }
        }
    }

    fn csi_intermediate<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        loop {
            let c = self.reader.read_byte()?;
            match c {
                ascii::DEL => {}
                0x20..=0x2f => self.collect_intermediate(c),
                0x30..=0x3f => return Ok(Flow::Next(State::CsiIgnore)),
                0x40..=0x7e => {
                    self.dispatch_csi(handler, c)?;
                    return Ok(Flow::Pause(State::Output));
                }
                _ => {
                    self.reader.unread(c);
                    return Ok(Flow::Next(State::CsiIntermediate));
                }
            }
        }
    }

    /// A malformed CSI sequence; swallow it up to its final byte.
    fn csi_ignore(&mut self) -> Result<Flow, ParserError> {
        loop {
            let c = self.reader.read_byte()?;
            let low = c & 0x7f;
            match low {
                0x20..=0x3f | ascii::DEL => {}
                0x40..=0x7e => return Ok(Flow::Next(State::Output)),
                _ => {
                    self.reader.unread(c);
                    return Ok(Flow::Next(State::CsiIgnore));
                }
            }
        }
    }

    fn osc_string<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        self.clear();
        loop {
            let c = self.reader.read_byte()?;
            if c == ascii::BEL {
                handler.handle_osc(&self.params());
                return Ok(Flow::Pause(State::Output));
            } else if is_ctrl_code(c) {
                // ignore
            } else if is_graphical_code(c) {
                self.collect_param(c);
            } else if c == ascii::ESC {
                // includes ST
                handler.handle_osc(&self.params());
                return Ok(Flow::Pause(State::Escape));
            } else {
                // CAN or SUB cuts the string short
                handler.handle_osc(&self.params());
                self.reader.unread(c);
                return Ok(Flow::Pause(State::OscString));
            }
        }
    }

    fn dcs_entry(&mut self) -> Result<Flow, ParserError> {
        self.clear();

        let c = self.reader.read_byte()?;
        if c == ascii::DEL || is_ctrl_code(c) {
            return Ok(Flow::Next(State::DcsEntry));
        }
        match c {
            0x20..=0x2f => {
                self.collect_intermediate(c);
                return Ok(Flow::Next(State::DcsIntermediate));
            }
            b'0'..=b'9' | b';' => {
                self.collect_param(c);
                return Ok(Flow::Next(State::DcsParam));
            }
            0x3c..=0x3f => {
                self.collect_intermediate(c);
                return Ok(Flow::Next(State::DcsParam));
            }
            0x3a => return Ok(Flow::Next(State::IgnoreAll)),
            // The final byte is consumed by the passthrough state.
            0x40..=0x7e => {
                self.reader.unread(c);
                return Ok(Flow::Next(State::DcsPassthrough));
            }
            _ => self.reader.unread(c),
        }
        Ok(Flow::Next(State::DcsEntry))
    }

    fn dcs_param(&mut self) -> Result<Flow, ParserError> {
        loop {
            let c = self.reader.read_byte()?;
            if c == ascii::DEL || is_ctrl_code(c) {
                continue;
            }
            match c {
                0x20..=0x2f => {
                    self.collect_intermediate(c);
                    return Ok(Flow::Next(State::DcsIntermediate));
                }
                b'0'..=b'9' | b';' => self.collect_param(c),
                0x3a | 0x3c..=0x3f => return Ok(Flow::Next(State::IgnoreAll)),
                0x40..=0x7e => {
                    self.reader.unread(c);
                    return Ok(Flow::Next(State::DcsPassthrough));
                }
                _ => {
                    self.reader.unread(c);
                    return Ok(Flow::Next(State::DcsParam));
                }
            }
        }
    }

    fn dcs_intermediate(&mut self) -> Result<Flow, ParserError> {
        loop {
            let c = self.reader.read_byte()?;
            if c == ascii::DEL || is_ctrl_code(c) {
                continue;
            }
            match c {
                0x20..=0x2f => self.collect_intermediate(c),
                0x30..=0x3f => return Ok(Flow::Next(State::IgnoreAll)),
                0x40..=0x7e => {
                    self.reader.unread(c);
                    return Ok(Flow::Next(State::DcsPassthrough));
                }
                _ => {
                    self.reader.unread(c);
                    return Ok(Flow::Next(State::DcsIntermediate));
                }
            }
        }
    }

    fn dcs_passthrough<H: Dispatch>(&mut self, handler: &mut H) -> Result<Flow, ParserError> {
        let c = self.reader.read_byte()?;
        let params = self.params();
        let intermediates = self.partial_intermediates.clone();
        handler.handle_dcs(&params, &intermediates, c);

        debug!("discarding DCS data trailing the final byte");
        Ok(Flow::Next(State::IgnoreAll))
    }

    /// Consume and discard everything that cannot leave this state through
    /// a common transition.
    fn ignore_all(&mut self) -> Result<Flow, ParserError> {
        loop {
            let c = self.reader.read_byte()?;
            if is_ctrl_code(c) || is_graphical_code(c) {
                continue;
            }
            self.reader.unread(c);
            return Ok(Flow::Next(State::IgnoreAll));
        }
    }

    fn dispatch_csi<H: Dispatch>(&mut self, handler: &mut H, c: u8) -> Result<(), DispatchError> {
        let params = self.params();
        let intermediates = self.partial_intermediates.clone();
        handler.handle_csi(&params, &intermediates, c)
    }

    /// The "clear" action.
    fn clear(&mut self) {
        self.partial_params.clear();
        self.partial_param.clear();
        self.partial_intermediates.clear();
    }

    /// The "collect" action.
    fn collect_intermediate(&mut self, c: u8) {
        self.partial_intermediates.push(c as char);
    }

    /// The "param" action. Used for both CSI and OSC, so it takes any
    /// byte, not just digits.
    fn collect_param(&mut self, c: u8) {
        if c == b';' {
            self.partial_params
                .push(String::from_utf8_lossy(&self.partial_param).into_owned());
            self.partial_param.clear();
        } else {
            self.partial_param.push(c);
        }
    }

    fn params(&self) -> Vec<String> {
        let mut params = self.partial_params.clone();
        params.push(String::from_utf8_lossy(&self.partial_param).into_owned());
        params
    }
}
