//! Per-class sample counts for the training panel.

use crate::classifier::{Classifier, FrameSource};
use crate::error::GameError;
use crate::gesture::GestureClass;

/// Captured-sample counters, one per gesture class, each in `0..=cap`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelStore {
    counts: [u32; 3],
    cap: u32,
}

impl LabelStore {
    pub fn new(cap: u32) -> Self {
        Self { counts: [0; 3], cap }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn count(&self, class: GestureClass) -> u32 {
        self.counts[class.index()]
    }

    pub fn all_at_cap(&self) -> bool {
        self.counts.iter().all(|&c| c >= self.cap)
    }

    /// Capture the current frame as a training example for `class`.
    ///
    /// Returns `Ok(false)` once the class is at its cap. Nothing is counted
    /// unless the classifier accepted the example.
    pub fn record_sample<F, C>(&mut self, class: GestureClass, frames: &mut F, classifier: &mut C) -> Result<bool, GameError>
    where
        F: FrameSource + ?Sized,
        C: Classifier + ?Sized,
    {
        if self.count(class) >= self.cap {
            return Ok(false);
        }
        if !frames.is_ready() {
            return Err(GameError::FrameNotReady);
        }
        let features = frames.infer().ok_or(GameError::FrameNotReady)?;
        classifier.add_example(features, class)?;
        self.counts[class.index()] += 1;
        Ok(true)
    }

    /// Drop every example of `class` from the classifier and zero its count.
    pub fn clear<C: Classifier + ?Sized>(&mut self, class: GestureClass, classifier: &mut C) {
        classifier.clear_label(class);
        self.counts[class.index()] = 0;
    }

    pub fn has_any_trained_class<C: Classifier + ?Sized>(&self, classifier: &C) -> bool {
        classifier.count_labels_with_data() > 0
    }
}
