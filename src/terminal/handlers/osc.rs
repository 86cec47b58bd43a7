//! OSC dispatch: hyperlinks plus a handful of recognized-but-inert tags.

use super::{log_unhandled_osc, ScreenHandler};

impl ScreenHandler {
    pub(crate) fn dispatch_osc(&mut self, params: &[String]) {
        let Some(tag) = params.first() else {
            return;
        };
        match tag.as_str() {
            // Hyperlink: OSC 8 ; params ; uri. A missing or empty uri ends
            // the link.
            "8" => {
                if params.len() < 3 {
                    self.screen.lock().reset_uri();
                } else {
                    self.screen.lock().set_uri(&params[2]);
                }
            }
            // Window title
            "0" => {}
            // Working directory
            "7" => {}
            // Semantic prompt (FinalTerm)
            "133" => {}
            // Shell integration (VSCode)
            "633" => {}
            // User vars (iTerm2)
            "1337" => {}
            _ => log_unhandled_osc(params),
        }
    }
}
