//! Rendering seam. The game core only talks to [`ViewNotifier`]; [`DomView`]
//! is the browser implementation that writes into plain DOM elements.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, window};

use crate::gesture::GestureClass;

/// Everything the core tells the page.
pub trait ViewNotifier {
    fn set_instructions(&mut self, text: &str);
    fn set_countdown(&mut self, seconds: u32);
    fn set_outcome_text(&mut self, text: &str);
    fn set_outcome_visible(&mut self, visible: bool);
    /// Sample count for `class`, in `0..=cap`.
    fn set_progress(&mut self, class: GestureClass, count: u32, cap: u32);
    fn set_opponent_glyph(&mut self, class: GestureClass);
    fn set_player_text(&mut self, text: &str);
    fn set_selected(&mut self, class: Option<GestureClass>);
}

pub const ID_INSTRUCTIONS: &str = "rps-instructions";
pub const ID_WINNER: &str = "rps-winner";
pub const ID_AI_MOVE: &str = "rps-ai-move";
pub const ID_PLAYER: &str = "rps-player";

pub fn progress_id(class: GestureClass) -> String {
    format!("rps-progress-{}", class.id())
}

/// Fill level in `0..=100`. Computed in `u64` so large caps cannot overflow.
pub fn progress_percent(count: u32, cap: u32) -> u32 {
    if cap == 0 {
        return 0;
    }
    (u64::from(count.min(cap)) * 100 / u64::from(cap)) as u32
}

pub fn class_button_id(class: GestureClass) -> String {
    format!("rps-class-{}", class.id())
}

/// Writes game state into DOM elements looked up by id. Missing elements are
/// created and appended to `<body>` so the game works on a bare page.
pub struct DomView {
    doc: Document,
    instructions: Element,
    winner: Element,
    ai_move: Element,
    player: Element,
    progress: [Element; 3],
    buttons: [Element; 3],
}

fn find_or_create(doc: &Document, id: &str, tag: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&el)?;
    Ok(el)
}

impl DomView {
    pub fn attach() -> Result<Self, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let doc = win
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let instructions = find_or_create(&doc, ID_INSTRUCTIONS, "p")?;
        let winner = find_or_create(&doc, ID_WINNER, "p")?;
        let ai_move = find_or_create(&doc, ID_AI_MOVE, "p")?;
        let player = find_or_create(&doc, ID_PLAYER, "p")?;
        let mut progress = Vec::with_capacity(3);
        let mut buttons = Vec::with_capacity(3);
        for g in GestureClass::ALL {
            let button = find_or_create(&doc, &class_button_id(g), "div")?;
            if button.text_content().unwrap_or_default().is_empty() {
                button.set_text_content(Some(&format!("{} {}", g.display_name(), g.glyph())));
            }
            buttons.push(button);
            progress.push(find_or_create(&doc, &progress_id(g), "div")?);
        }
        let progress: [Element; 3] = progress
            .try_into()
            .map_err(|_| JsValue::from_str("progress elements"))?;
        let buttons: [Element; 3] = buttons
            .try_into()
            .map_err(|_| JsValue::from_str("class buttons"))?;

        Ok(Self { doc, instructions, winner, ai_move, player, progress, buttons })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }
}

impl ViewNotifier for DomView {
    fn set_instructions(&mut self, text: &str) {
        self.instructions.set_text_content(Some(text));
    }

    // Countdown and outcome share the slot between the two players.
    fn set_countdown(&mut self, seconds: u32) {
        self.winner.set_text_content(Some(&seconds.to_string()));
    }

    fn set_outcome_text(&mut self, text: &str) {
        self.winner.set_text_content(Some(text));
    }

    fn set_outcome_visible(&mut self, visible: bool) {
        let vis = if visible { "visibility:visible" } else { "visibility:hidden" };
        self.winner.set_attribute("style", vis).ok();
    }

    fn set_progress(&mut self, class: GestureClass, count: u32, cap: u32) {
        let el = &self.progress[class.index()];
        let pct = progress_percent(count, cap);
        // red -> green as the class fills up
        let hue = pct * 120 / 100;
        let style = format!("width:{pct}%; background:hsl({hue},90%,50%); white-space:nowrap;");
        el.set_attribute("style", &style).ok();
        el.set_text_content(Some(&format!("{count} frames collected")));
    }

    fn set_opponent_glyph(&mut self, class: GestureClass) {
        self.ai_move.set_text_content(Some(class.glyph()));
    }

    fn set_player_text(&mut self, text: &str) {
        self.player.set_text_content(Some(text));
    }

    fn set_selected(&mut self, class: Option<GestureClass>) {
        for g in GestureClass::ALL {
            let style = if Some(g) == class {
                "background-color:#cdcdcd; box-shadow:inset 0 0 5px rgba(0,0,0,0.4);"
            } else {
                "background-color:#dcdcdc; box-shadow:0 0 10px rgba(0,0,0,0.4);"
            };
            self.buttons[g.index()].set_attribute("style", style).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 100), 0);
        assert_eq!(progress_percent(42, 100), 42);
        assert_eq!(progress_percent(250, 100), 100);
        assert_eq!(progress_percent(5, 0), 0);
        assert_eq!(progress_percent(u32::MAX / 2, u32::MAX), 49);
        assert_eq!(progress_percent(u32::MAX, u32::MAX), 100);
    }
}
