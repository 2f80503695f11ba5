use thiserror::Error;

use crate::gesture::UnknownGesture;

/// Failures reported by a [`crate::classifier::Classifier`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("classifier has no training examples")]
    NoExamples,

    #[error("feature vector is empty")]
    EmptyFeatures,

    #[error("invalid feature size: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature vector contains NaN or infinite values")]
    NonFiniteFeatures,
}

/// Everything the game core can refuse or absorb. None of these are fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("no gesture class has training data yet")]
    InsufficientData,

    #[error("a round is already counting down")]
    RoundInProgress,

    #[error("video frame is not ready")]
    FrameNotReady,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    UnknownGesture(#[from] UnknownGesture),

    #[error("classifier error: {0}")]
    Classify(#[from] ClassifyError),
}

impl From<GameError> for wasm_bindgen::JsValue {
    fn from(err: GameError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
