//! Terminal core tests.
//!
//! Organized by subsystem:
//! - parser_tests: state machine transitions and dispatch events
//! - screen_tests: scrollback, cursor, and attribute sharing
//! - style_tests: CSI/SGR/OSC dispatch semantics
//! - render_tests: HTML serialization
