//! Game controller: training capture, classification gating and the
//! frame-driven countdown that ends in a resolved round.

use log::{debug, info, warn};

use crate::classifier::{Classifier, FrameSource};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::gesture::{GestureClass, Outcome};
use crate::labels::LabelStore;
use crate::live::{LiveClassification, Poll};
use crate::opponent::MovePicker;
use crate::view::ViewNotifier;

pub const TRAIN_PROMPT: &str = "Select a class and hold the Space bar to begin training.";
pub const NEED_TRAINING: &str = "You must train a class to begin playing!";
pub const READY_PROMPT: &str = "Click Play and hold up a move!";
pub const NO_TRAINING_DATA: &str = "Need training data";
pub const NO_MOVE_DETECTED: &str = "No move detected. Hold up a trained gesture and try again!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    /// `ticks` counts display refreshes since the round started.
    Counting { seconds_remaining: u32, ticks: u32 },
}

/// Final record of one round. `player` is the prediction frozen at expiry;
/// `outcome` is `None` only when no prediction existed at that instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundRecord {
    pub player: Option<GestureClass>,
    pub opponent: GestureClass,
    pub outcome: Option<Outcome>,
}

impl RoundRecord {
    pub fn message(&self) -> String {
        match (self.player, self.outcome) {
            (Some(player), Some(outcome)) => outcome.message(player, self.opponent),
            _ => NO_MOVE_DETECTED.to_string(),
        }
    }
}

/// Owns all game state. Collaborators are injected: the classifier, the frame
/// source, the view and the opponent's move picker.
pub struct GameController<C, F, V, P> {
    config: GameConfig,
    labels: LabelStore,
    classifier: C,
    frames: F,
    view: V,
    picker: P,
    live: LiveClassification,
    // ModelReadiness: live classification armed since the last round start / clear
    model_ready: bool,
    selected: Option<GestureClass>,
    capture_held: bool,
    round: RoundState,
    displayed_bluff: Option<GestureClass>,
    last_round: Option<RoundRecord>,
    rounds_played: u32,
}

impl<C, F, V, P> GameController<C, F, V, P>
where
    C: Classifier,
    F: FrameSource,
    V: ViewNotifier,
    P: MovePicker,
{
    pub fn new(config: GameConfig, classifier: C, frames: F, view: V, picker: P) -> Result<Self, GameError> {
        config.validate()?;
        let labels = LabelStore::new(config.sample_cap);
        let mut ctrl = Self {
            config,
            labels,
            classifier,
            frames,
            view,
            picker,
            live: LiveClassification::new(),
            model_ready: false,
            selected: None,
            capture_held: false,
            round: RoundState::Idle,
            displayed_bluff: None,
            last_round: None,
            rounds_played: 0,
        };
        ctrl.view.set_instructions(TRAIN_PROMPT);
        ctrl.view.set_player_text(NO_TRAINING_DATA);
        ctrl.view.set_outcome_visible(false);
        ctrl.view.set_selected(None);
        for g in GestureClass::ALL {
            ctrl.view.set_progress(g, 0, ctrl.labels.cap());
        }
        Ok(ctrl)
    }

    // --- Input ---------------------------------------------------------------

    pub fn select_class(&mut self, class: GestureClass) {
        self.selected = Some(class);
        self.view.set_selected(self.selected);
        self.view.set_progress(class, self.labels.count(class), self.labels.cap());
    }

    pub fn set_capture_held(&mut self, held: bool) {
        self.capture_held = held;
    }

    /// Wipe the selected class's training data. Returns `false` when nothing
    /// is selected.
    pub fn clear_selected(&mut self) -> bool {
        let Some(class) = self.selected else {
            return false;
        };
        self.labels.clear(class, &mut self.classifier);
        info!("cleared training data for {class}");
        self.view.set_progress(class, 0, self.labels.cap());
        self.view.set_instructions(TRAIN_PROMPT);
        self.view.set_outcome_visible(false);
        self.model_ready = false;
        self.live.resume();
        if !self.labels.has_any_trained_class(&self.classifier) {
            // Nothing left to classify against.
            self.live = LiveClassification::new();
            self.view.set_player_text(NO_TRAINING_DATA);
        }
        true
    }

    /// Start a countdown round. Refused while counting or before any class
    /// has training data; the refusal leaves the state untouched.
    pub fn request_round(&mut self) -> Result<(), GameError> {
        if self.is_counting() {
            return Err(GameError::RoundInProgress);
        }
        if !self.labels.has_any_trained_class(&self.classifier) {
            warn!("round refused: no trained class");
            self.view.set_instructions(NEED_TRAINING);
            return Err(GameError::InsufficientData);
        }
        let seconds = self.config.countdown_seconds;
        self.round = RoundState::Counting { seconds_remaining: seconds, ticks: 0 };
        // Re-arm so a loop halted by an earlier inference error classifies this round.
        self.live.arm();
        self.live.resume();
        self.model_ready = false;
        self.displayed_bluff = None;
        self.view.set_countdown(seconds);
        self.view.set_outcome_visible(true);
        self.view.set_instructions(&capturing_text(seconds));
        info!("round {} started, capturing in {seconds}s", self.rounds_played + 1);
        Ok(())
    }

    // --- Frame loop ----------------------------------------------------------

    /// One display refresh. Returns the round record on the tick a round resolves.
    pub fn tick(&mut self) -> Option<RoundRecord> {
        self.capture_tick();
        self.rearm_if_needed();
        self.poll_live();
        if self.is_counting() {
            self.countdown_tick()
        } else {
            if self.labels.all_at_cap() {
                self.view.set_instructions(READY_PROMPT);
            }
            None
        }
    }

    fn capture_tick(&mut self) {
        let Some(class) = self.selected else { return };
        if !self.capture_held || !self.frames.is_ready() {
            return;
        }
        match self.labels.record_sample(class, &mut self.frames, &mut self.classifier) {
            Ok(true) => self.view.set_progress(class, self.labels.count(class), self.labels.cap()),
            Ok(false) => {}
            Err(err) => warn!("sample for {class} dropped: {err}"),
        }
    }

    fn rearm_if_needed(&mut self) {
        if self.model_ready || self.is_counting() {
            return;
        }
        if self.classifier.count_labels_with_data() > 0 {
            debug!("arming live classification");
            self.live.arm();
            self.model_ready = true;
        }
    }

    fn poll_live(&mut self) {
        match self.live.poll(&self.classifier, &mut self.frames) {
            Poll::Predicted(label) => self.view.set_player_text(label.glyph()),
            Poll::Failed(_) | Poll::Idle => {}
        }
    }

    fn countdown_tick(&mut self) -> Option<RoundRecord> {
        let RoundState::Counting { seconds_remaining, ticks } = self.round else {
            return None;
        };
        let mut seconds = seconds_remaining;

        if ticks % self.config.bluff_every == 0 {
            // Cosmetic only: the committed move is drawn at expiry.
            let bluff = GestureClass::from_index((ticks / self.config.bluff_every) as usize);
            self.displayed_bluff = Some(bluff);
            self.view.set_opponent_glyph(bluff);
        }
        let tps = self.config.ticks_per_second;
        if ticks % tps == tps - 1 {
            seconds = seconds.saturating_sub(1);
        }

        if seconds == 0 {
            return Some(self.resolve_round());
        }
        self.round = RoundState::Counting { seconds_remaining: seconds, ticks: ticks + 1 };
        self.view.set_countdown(seconds);
        self.view.set_instructions(&capturing_text(seconds));
        None
    }

    fn resolve_round(&mut self) -> RoundRecord {
        self.live.pause();
        let player = self.live.latest();
        let opponent = self.picker.pick();
        let record = RoundRecord {
            player,
            opponent,
            outcome: player.map(|p| Outcome::decide(p, opponent)),
        };

        self.round = RoundState::Idle;
        self.displayed_bluff = None;
        self.last_round = Some(record);
        self.rounds_played += 1;

        let text = record.message();
        self.view.set_opponent_glyph(opponent);
        self.view.set_outcome_text(&text);
        self.view.set_outcome_visible(true);
        self.view.set_instructions(READY_PROMPT);
        info!("round {} resolved: {text}", self.rounds_played);
        record
    }

    // --- Accessors -----------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn is_counting(&self) -> bool {
        matches!(self.round, RoundState::Counting { .. })
    }

    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    pub fn selected(&self) -> Option<GestureClass> {
        self.selected
    }

    pub fn is_model_ready(&self) -> bool {
        self.model_ready
    }

    pub fn live(&self) -> &LiveClassification {
        &self.live
    }

    /// Latest live prediction (frozen after a round resolves).
    pub fn prediction(&self) -> Option<GestureClass> {
        self.live.latest()
    }

    pub fn displayed_bluff(&self) -> Option<GestureClass> {
        self.displayed_bluff
    }

    pub fn last_round(&self) -> Option<RoundRecord> {
        self.last_round
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn picker(&self) -> &P {
        &self.picker
    }
}

fn capturing_text(seconds: u32) -> String {
    format!("Capturing in {seconds} seconds...")
}
