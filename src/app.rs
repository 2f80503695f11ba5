//! Browser glue: owns the single game instance, wires DOM events into it and
//! drives it from `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, KeyboardEvent, window};

use crate::classifier::{KnnClassifier, LatestFrame};
use crate::config::GameConfig;
use crate::controller::GameController;
use crate::gesture::GestureClass;
use crate::opponent::EntropyPicker;
use crate::view::{DomView, class_button_id};

pub type BrowserGame = GameController<KnnClassifier, LatestFrame, DomView, EntropyPicker>;

pub const ID_PLAY: &str = "rps-play";
pub const ID_RESET: &str = "rps-reset";
pub const ID_TRAIN: &str = "rps-train";

thread_local! {
    static GAME: RefCell<Option<BrowserGame>> = const { RefCell::new(None) };
}

/// Run `f` against the live game, if started.
fn with_game<R>(f: impl FnOnce(&mut BrowserGame) -> R) -> Option<R> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub fn start(config: GameConfig) -> Result<(), JsValue> {
    let view = DomView::attach()?;
    let doc = view.document().clone();
    let classifier = KnnClassifier::new(config.neighbors);
    let game = GameController::new(config, classifier, LatestFrame::new(), view, EntropyPicker::new())?;

    // A second start replaces the game but keeps the listeners and loop already installed.
    let restarted = GAME.with(|cell| cell.borrow_mut().replace(game).is_some());
    if restarted {
        log::info!("game restarted, training data discarded");
        return Ok(());
    }
    install_listeners(&doc)?;
    start_frame_loop();
    log::info!("game started");
    Ok(())
}

fn listen(target: &web_sys::EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn is_space(ev: &Event) -> bool {
    ev.dyn_ref::<KeyboardEvent>()
        .map(|k| k.code() == "Space" || k.key() == " ")
        .unwrap_or(false)
}

fn install_listeners(doc: &Document) -> Result<(), JsValue> {
    listen(doc, "keydown", |ev| {
        if is_space(&ev) {
            ev.prevent_default();
            with_game(|g| g.set_capture_held(true));
        }
    })?;
    listen(doc, "keyup", |ev| {
        if is_space(&ev) {
            with_game(|g| g.set_capture_held(false));
        }
    })?;

    for class in GestureClass::ALL {
        if let Some(button) = doc.get_element_by_id(&class_button_id(class)) {
            listen(&button, "click", move |_| {
                with_game(|g| g.select_class(class));
            })?;
        }
    }

    // Optional page controls; the exported functions below work without them.
    if let Some(play) = doc.get_element_by_id(ID_PLAY) {
        listen(&play, "click", |_| {
            play_round();
        })?;
    }
    if let Some(reset) = doc.get_element_by_id(ID_RESET) {
        listen(&reset, "click", |_| {
            clear_selected_class();
        })?;
    }
    if let Some(train) = doc.get_element_by_id(ID_TRAIN) {
        for (kind, held) in [("pointerdown", true), ("pointerup", false), ("pointerleave", false)] {
            listen(&train, kind, move |_| {
                with_game(|g| g.set_capture_held(held));
            })?;
        }
    }
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        with_game(|game| game.tick());
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

// --- JS-facing input ---------------------------------------------------------

/// Latest MobileNet embedding of the video frame.
#[wasm_bindgen]
pub fn submit_frame(features: Vec<f32>) {
    with_game(|g| g.frames_mut().submit(features));
}

/// Called once the video element has loaded (and with `false` if it goes away).
#[wasm_bindgen]
pub fn set_video_ready(ready: bool) {
    with_game(|g| g.frames_mut().set_ready(ready));
}

#[wasm_bindgen]
pub fn select_class(id: &str) -> Result<(), JsValue> {
    let class: GestureClass = id.parse().map_err(crate::error::GameError::from)?;
    with_game(|g| g.select_class(class)).ok_or_else(|| JsValue::from_str("game not started"))
}

#[wasm_bindgen]
pub fn set_capture_held(held: bool) {
    with_game(|g| g.set_capture_held(held));
}

/// Clear training data of the selected class. `false` if none is selected.
#[wasm_bindgen]
pub fn clear_selected_class() -> bool {
    with_game(|g| g.clear_selected()).unwrap_or(false)
}

/// Try to start a round; `false` when refused (the page already shows why).
#[wasm_bindgen]
pub fn play_round() -> bool {
    with_game(|g| g.request_round().is_ok()).unwrap_or(false)
}

/// Number of samples captured for a class, for pages that draw their own bars.
#[wasm_bindgen]
pub fn sample_count(id: &str) -> u32 {
    let Ok(class) = id.parse::<GestureClass>() else {
        return 0;
    };
    with_game(|g| g.labels().count(class)).unwrap_or(0)
}
