//! Control-byte constants used by the parser and dispatch handlers.
//!
//! Only the bytes this crate matches on are named here; everything else is
//! handled by range checks in the parser.

/// Bell.
pub const BEL: u8 = 0x07;
/// Backspace.
pub const BS: u8 = 0x08;
/// Horizontal tab.
pub const TAB: u8 = 0x09;
/// Line feed.
pub const LF: u8 = 0x0A;
/// Vertical tab.
pub const VT: u8 = 0x0B;
/// Form feed.
pub const FF: u8 = 0x0C;
/// Carriage return.
pub const CR: u8 = 0x0D;
/// Cancel. Cuts an escape sequence short.
pub const CAN: u8 = 0x18;
/// Substitute. Treated like CAN.
pub const SUB: u8 = 0x1A;
/// Escape.
pub const ESC: u8 = 0x1B;
/// Delete.
pub const DEL: u8 = 0x7F;

/// Next line (C1). Synthesized from `ESC E`; never read as an 8-bit byte.
pub const NEL: u8 = 0x85;
