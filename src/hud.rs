//! Display state published to the on-screen UI
//!
//! The HUD owns no game logic. It receives `{ score, is_game_over }` every
//! time either changes and shows the latest value.

use serde::{Deserialize, Serialize};

/// What the score readout and the game-over overlay show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayState {
    pub score: u64,
    pub is_game_over: bool,
}

/// Last-write-wins display output
pub trait DisplaySink {
    fn publish(&mut self, state: DisplayState);
}

#[cfg(target_arch = "wasm32")]
pub use web::DomHud;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{DisplaySink, DisplayState};

    /// Writes into the page's HUD elements
    #[derive(Debug, Default)]
    pub struct DomHud;

    impl DisplaySink for DomHud {
        fn publish(&mut self, state: DisplayState) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            // Update score
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score.to_string()));
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if state.is_game_over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&state.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }
}
