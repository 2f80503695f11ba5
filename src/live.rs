//! Continuous classification of the live video feed.
//!
//! Driven by polling: the frame loop calls [`LiveClassification::poll`] once per
//! tick and each poll runs at most one inference. The pause flag is only
//! checked at the top of `poll`, so a pause never interrupts an inference in
//! progress and there is no backlog of queued requests.

use log::{debug, error};

use crate::classifier::{Classifier, FrameSource};
use crate::error::ClassifyError;
use crate::gesture::GestureClass;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveClassification {
    armed: bool,
    paused: bool,
    halted: bool,
    latest: Option<GestureClass>,
}

/// What a single poll did.
#[derive(Clone, Debug, PartialEq)]
pub enum Poll {
    /// Not armed, paused, halted, or no frame yet.
    Idle,
    Predicted(GestureClass),
    /// Inference failed; the loop is halted until re-armed.
    Failed(ClassifyError),
}

impl LiveClassification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart after an error) continuous classification. Does not
    /// lift a pause.
    pub fn arm(&mut self) {
        debug!("live classification armed (paused={})", self.paused);
        self.armed = true;
        self.halted = false;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_running(&self) -> bool {
        self.armed && !self.paused && !self.halted
    }

    /// Most recent prediction; frozen while paused or halted.
    pub fn latest(&self) -> Option<GestureClass> {
        self.latest
    }

    pub fn poll<C, F>(&mut self, classifier: &C, frames: &mut F) -> Poll
    where
        C: Classifier + ?Sized,
        F: FrameSource + ?Sized,
    {
        if !self.is_running() || !frames.is_ready() {
            return Poll::Idle;
        }
        let Some(features) = frames.infer() else {
            return Poll::Idle;
        };
        match classifier.classify(&features) {
            Ok(label) => {
                self.latest = Some(label);
                Poll::Predicted(label)
            }
            Err(err) => {
                error!("live classification stopped: {err}");
                self.halted = true;
                Poll::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{KnnClassifier, LatestFrame};

    fn setup() -> (KnnClassifier, LatestFrame) {
        let mut knn = KnnClassifier::new(1);
        knn.add_example(vec![1.0, 0.0], GestureClass::Rock).unwrap();
        knn.add_example(vec![0.0, 1.0], GestureClass::Paper).unwrap();
        let mut frames = LatestFrame::new();
        frames.set_ready(true);
        frames.submit(vec![1.0, 0.1]);
        (knn, frames)
    }

    #[test]
    fn test_unarmed_does_nothing() {
        let (knn, mut frames) = setup();
        let mut live = LiveClassification::new();
        assert_eq!(live.poll(&knn, &mut frames), Poll::Idle);
        assert_eq!(live.latest(), None);
    }

    #[test]
    fn test_pause_freezes_latest() {
        let (knn, mut frames) = setup();
        let mut live = LiveClassification::new();
        live.arm();
        assert_eq!(live.poll(&knn, &mut frames), Poll::Predicted(GestureClass::Rock));
        live.pause();
        frames.submit(vec![0.0, 1.0]);
        assert_eq!(live.poll(&knn, &mut frames), Poll::Idle);
        assert_eq!(live.latest(), Some(GestureClass::Rock));
        // re-arming keeps the pause
        live.arm();
        assert_eq!(live.poll(&knn, &mut frames), Poll::Idle);
        live.resume();
        assert_eq!(live.poll(&knn, &mut frames), Poll::Predicted(GestureClass::Paper));
    }

    #[test]
    fn test_error_halts_until_rearmed() {
        let (knn, mut frames) = setup();
        let mut live = LiveClassification::new();
        live.arm();
        frames.submit(vec![1.0, 0.0, 0.0]);
        assert!(matches!(live.poll(&knn, &mut frames), Poll::Failed(ClassifyError::DimensionMismatch { .. })));
        assert!(live.is_halted());
        frames.submit(vec![0.0, 1.0]);
        assert_eq!(live.poll(&knn, &mut frames), Poll::Idle);
        live.arm();
        assert_eq!(live.poll(&knn, &mut frames), Poll::Predicted(GestureClass::Paper));
    }

    #[test]
    fn test_frame_not_ready_skips() {
        let (knn, mut frames) = setup();
        let mut live = LiveClassification::new();
        live.arm();
        frames.set_ready(false);
        assert_eq!(live.poll(&knn, &mut frames), Poll::Idle);
        assert!(!live.is_halted());
    }
}
