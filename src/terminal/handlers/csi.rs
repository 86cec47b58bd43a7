//! CSI dispatch: cursor movement, erasing, and mode changes.
//!
//! Handled finals (no intermediates): C (CUF), D (CUB), E (CNL), G (CHA),
//! H (CUP), J (ED), K (EL), m (SGR). With `?`: h (SM, alternate-screen
//! detection). With `!`: p (Soft Terminal Reset).

use super::{log_unhandled_csi, DispatchError, ScreenHandler};

/// Convert parameter strings to integers, substituting `default` for empty
/// strings. A non-integer parameter means the stream is structurally
/// invalid.
fn to_numeric(params: &[String], default: i64) -> Result<Vec<i64>, DispatchError> {
    params
        .iter()
        .map(|p| {
            if p.is_empty() {
                Ok(default)
            } else {
                p.parse::<i64>()
                    .map_err(|_| DispatchError::NonIntegerParam { param: p.clone() })
            }
        })
        .collect()
}

impl ScreenHandler {
    pub(crate) fn dispatch_csi(
        &mut self,
        params: &[String],
        intermediates: &str,
        final_byte: u8,
    ) -> Result<(), DispatchError> {
        if params.is_empty() {
            return Err(DispatchError::EmptyParams);
        }

        match (intermediates, final_byte) {
            // Cursor Forward (CUF)
            ("", b'C') => {
                let n = to_numeric(params, 1)?;
                self.screen.lock().right(n[0]);
            }
            // Cursor Backward (CUB)
            ("", b'D') => {
                let n = to_numeric(params, 1)?;
                self.screen.lock().left(n[0]);
            }
            // Cursor Next Line (CNL)
            ("", b'E') => {
                let n = to_numeric(params, 1)?;
                self.screen.lock().newlines(n[0]);
            }
            // Cursor Horizontal Absolute (CHA)
            ("", b'G') => {
                let n = to_numeric(params, 1)?;
                self.screen.lock().set_pos(0, n[0] - 1);
            }
            // Cursor Position (CUP). The row is meaningless in a
            // single-line screen; only the column applies.
            ("", b'H') => {
                let mut n = to_numeric(params, 1)?;
                if n.len() == 1 {
                    n.push(1);
                }
                self.screen.lock().set_pos(n[0] - 1, n[1] - 1);
            }
            // Erase in Display (ED) / Erase in Line (EL). One line deep,
            // so both erase within the active line.
            ("", b'J') | ("", b'K') => {
                let n = to_numeric(params, 0)?;
                let mut screen = self.screen.lock();
                match n[0] {
                    0 => screen.clear_right(),
                    1 => screen.clear_left(),
                    2 => screen.clear(),
                    _ => {}
                }
            }
            // Select Graphic Rendition (SGR)
            ("", b'm') => {
                let n = to_numeric(params, 0)?;
                self.apply_sgr(&n);
            }
            // Set Mode (SM), private. An alternate-screen request means a
            // full-screen application is starting up.
            ("?", b'h') => {
                let n = to_numeric(params, 0)?;
                for param in n {
                    match param {
                        // Alternate screen buffer, SMCUP
                        47 | 1049 => self.upgrade(),
                        _ => {}
                    }
                }
            }
            // Soft Terminal Reset
            ("!", b'p') => self.screen.lock().reset_attributes(),
            _ => log_unhandled_csi(final_byte, params, intermediates),
        }
        Ok(())
    }
}
