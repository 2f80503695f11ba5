//! Hand RPS core crate.
//!
//! Rock-paper-scissors against the computer, where the player's move is a hand
//! gesture recognized from the webcam. JS supplies MobileNet embeddings of the
//! video frames; training, the kNN classifier, and the countdown game loop
//! live here. Everything outside `app`, `view` and `logging` is plain Rust and
//! runs natively under `cargo test`.

use wasm_bindgen::prelude::*;

mod app;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod error;
pub mod gesture;
pub mod labels;
pub mod live;
mod logging;
pub mod opponent;
pub mod view;

pub use app::{clear_selected_class, play_round, sample_count, select_class, set_capture_held, set_video_ready, submit_frame};
pub use classifier::{Classifier, FeatureVector, FrameSource, KnnClassifier, LatestFrame};
pub use config::GameConfig;
pub use controller::{GameController, RoundRecord, RoundState};
pub use error::{ClassifyError, GameError};
pub use gesture::{GestureClass, Outcome};
pub use labels::LabelStore;
pub use live::LiveClassification;
pub use opponent::{EntropyPicker, MovePicker, ScriptedPicker};
pub use view::ViewNotifier;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    app::start(GameConfig::default())
}

/// Start with a JSON config, e.g. `{"sample_cap": 50, "countdown_seconds": 5}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    app::start(config)
}

/// Display glyph for a class id, empty for unknown ids.
#[wasm_bindgen]
pub fn gesture_glyph(id: &str) -> String {
    id.parse::<GestureClass>()
        .map(|g| g.glyph().to_string())
        .unwrap_or_default()
}
