//! Rich-Text Terminal (rtt) Library
//!
//! Parses the output of a child process attached to a pseudo-terminal and
//! renders it as styled HTML lines.

pub mod ascii;
pub mod terminal;

pub use terminal::parser::{Dispatch, DispatchError, Parser, ParserError};
pub use terminal::{Color, RichTextTerminal, Screen, StyleAttributes, StyleFlags};
