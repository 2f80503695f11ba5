//! Gesture classifier seam plus the in-crate k-nearest-neighbor implementation.
//!
//! Feature vectors are embeddings of a video frame produced by a pretrained
//! extractor (MobileNet, running on the JS side). The classifier only ever sees
//! those vectors.

use crate::error::ClassifyError;
use crate::gesture::GestureClass;

pub type FeatureVector = Vec<f32>;

/// Supplier of the current frame's embedding. Readiness gates every capture
/// and inference; callers must check [`FrameSource::is_ready`] first.
pub trait FrameSource {
    fn is_ready(&self) -> bool;
    /// Embedding for the current frame, `None` if nothing is available.
    fn infer(&mut self) -> Option<FeatureVector>;
}

/// Training store + predictor used by the game.
pub trait Classifier {
    fn add_example(&mut self, features: FeatureVector, label: GestureClass) -> Result<(), ClassifyError>;
    fn classify(&self, features: &[f32]) -> Result<GestureClass, ClassifyError>;
    fn clear_label(&mut self, label: GestureClass);
    fn count_labels_with_data(&self) -> usize;
}

/// Latest embedding pushed in from outside (JS in the browser build).
#[derive(Default, Debug)]
pub struct LatestFrame {
    ready: bool,
    features: Option<FeatureVector>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
        if !ready {
            self.features = None;
        }
    }

    pub fn submit(&mut self, features: FeatureVector) {
        self.features = Some(features);
    }
}

impl FrameSource for LatestFrame {
    fn is_ready(&self) -> bool {
        self.ready && self.features.is_some()
    }

    fn infer(&mut self) -> Option<FeatureVector> {
        if !self.ready {
            return None;
        }
        // The same frame may be sampled on consecutive ticks, as with a live video element.
        self.features.clone()
    }
}

struct Example {
    features: FeatureVector,
    norm: f32,
    label: GestureClass,
}

/// Cosine-similarity kNN with majority vote.
pub struct KnnClassifier {
    k: usize,
    dimension: Option<usize>,
    examples: Vec<Example>,
}

impl KnnClassifier {
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1), dimension: None, examples: Vec::new() }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples_for(&self, label: GestureClass) -> usize {
        self.examples.iter().filter(|e| e.label == label).count()
    }

    fn check_features(&self, features: &[f32]) -> Result<(), ClassifyError> {
        let actual = features.len();
        if actual == 0 {
            return Err(ClassifyError::EmptyFeatures);
        }
        if !features.iter().all(|x| x.is_finite()) {
            return Err(ClassifyError::NonFiniteFeatures);
        }
        match self.dimension {
            Some(expected) if expected != actual => Err(ClassifyError::DimensionMismatch { expected, actual }),
            _ => Ok(()),
        }
    }
}

impl Default for KnnClassifier {
    fn default() -> Self {
        Self::new(3)
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

impl Classifier for KnnClassifier {
    fn add_example(&mut self, features: FeatureVector, label: GestureClass) -> Result<(), ClassifyError> {
        self.check_features(&features)?;
        self.dimension = Some(features.len());
        let norm = l2_norm(&features);
        self.examples.push(Example { features, norm, label });
        Ok(())
    }

    fn classify(&self, features: &[f32]) -> Result<GestureClass, ClassifyError> {
        if self.examples.is_empty() {
            return Err(ClassifyError::NoExamples);
        }
        self.check_features(features)?;
        let q_norm = l2_norm(features);

        let mut scored: Vec<(f32, GestureClass)> = self
            .examples
            .iter()
            .map(|e| (cosine(features, q_norm, &e.features, e.norm), e.label))
            .collect();
        // Inputs are finite, but the dot product can still overflow; NaN sorts last.
        for s in &mut scored {
            if s.0.is_nan() {
                s.0 = f32::NEG_INFINITY;
            }
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let k = self.k.min(scored.len());
        let mut votes = [0usize; 3];
        let mut weight = [0f32; 3];
        for &(sim, label) in &scored[..k] {
            votes[label.index()] += 1;
            if sim.is_finite() {
                weight[label.index()] += sim;
            }
        }

        // Majority vote, then summed similarity, then class order.
        let mut best = GestureClass::Rock;
        for g in GestureClass::ALL {
            let (i, b) = (g.index(), best.index());
            if votes[i] > votes[b] || (votes[i] == votes[b] && weight[i] > weight[b]) {
                best = g;
            }
        }
        Ok(best)
    }

    fn clear_label(&mut self, label: GestureClass) {
        self.examples.retain(|e| e.label != label);
        if self.examples.is_empty() {
            self.dimension = None;
        }
    }

    fn count_labels_with_data(&self) -> usize {
        GestureClass::ALL.iter().filter(|&&g| self.examples.iter().any(|e| e.label == g)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GestureClass::*;

    fn trained() -> KnnClassifier {
        let mut knn = KnnClassifier::new(3);
        for v in [[1.0, 0.0, 0.0], [0.9, 0.1, 0.0], [0.95, 0.0, 0.05]] {
            knn.add_example(v.to_vec(), Rock).unwrap();
        }
        for v in [[0.0, 1.0, 0.0], [0.1, 0.9, 0.0]] {
            knn.add_example(v.to_vec(), Paper).unwrap();
        }
        for v in [[0.0, 0.0, 1.0], [0.0, 0.1, 0.9]] {
            knn.add_example(v.to_vec(), Scissors).unwrap();
        }
        knn
    }

    #[test]
    fn test_classify_nearest_cluster() {
        let knn = trained();
        assert_eq!(knn.classify(&[0.8, 0.1, 0.1]), Ok(Rock));
        assert_eq!(knn.classify(&[0.05, 0.95, 0.0]), Ok(Paper));
        assert_eq!(knn.classify(&[0.0, 0.2, 0.8]), Ok(Scissors));
    }

    #[test]
    fn test_scale_invariant() {
        let knn = trained();
        assert_eq!(knn.classify(&[0.0, 40.0, 1.0]), Ok(Paper));
    }

    #[test]
    fn test_empty_and_dimension_errors() {
        let mut knn = KnnClassifier::default();
        assert_eq!(knn.classify(&[1.0]), Err(ClassifyError::NoExamples));
        assert_eq!(knn.add_example(vec![], Rock), Err(ClassifyError::EmptyFeatures));
        knn.add_example(vec![1.0, 2.0], Rock).unwrap();
        assert_eq!(
            knn.add_example(vec![1.0, 2.0, 3.0], Paper),
            Err(ClassifyError::DimensionMismatch { expected: 2, actual: 3 })
        );
        assert_eq!(knn.classify(&[1.0]), Err(ClassifyError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_non_finite_features_rejected() {
        let mut knn = KnnClassifier::new(1);
        assert_eq!(knn.add_example(vec![f32::NAN, 0.0], Rock), Err(ClassifyError::NonFiniteFeatures));
        assert_eq!(knn.add_example(vec![f32::INFINITY, 0.0], Rock), Err(ClassifyError::NonFiniteFeatures));
        assert!(knn.is_empty());
        knn.add_example(vec![1.0, 0.0], Paper).unwrap();
        knn.add_example(vec![1.0, 0.0], Paper).unwrap();
        knn.add_example(vec![0.0, 1.0], Rock).unwrap();
        assert_eq!(knn.classify(&[1.0, 0.0]), Ok(Paper));
        assert_eq!(knn.classify(&[f32::NAN, 0.0]), Err(ClassifyError::NonFiniteFeatures));
    }

    #[test]
    fn test_overflowing_similarity_does_not_win() {
        let mut knn = KnnClassifier::new(1);
        knn.add_example(vec![f32::MAX, f32::MAX], Rock).unwrap();
        knn.add_example(vec![1.0, 0.0], Paper).unwrap();
        // inf / inf against the rock example; it must rank below paper's 0.0
        assert_eq!(knn.classify(&[f32::MAX, f32::MAX]), Ok(Paper));
    }

    #[test]
    fn test_clear_label_and_counts() {
        let mut knn = trained();
        assert_eq!(knn.count_labels_with_data(), 3);
        knn.clear_label(Rock);
        assert_eq!(knn.count_labels_with_data(), 2);
        assert_eq!(knn.examples_for(Rock), 0);
        assert_eq!(knn.examples_for(Paper), 2);
        // with rock gone the rock-ish query falls to a remaining class
        assert_ne!(knn.classify(&[1.0, 0.0, 0.0]), Ok(Rock));
        knn.clear_label(Paper);
        knn.clear_label(Scissors);
        assert!(knn.is_empty());
        // dimension resets once everything is cleared
        knn.add_example(vec![1.0; 5], Paper).unwrap();
        assert_eq!(knn.classify(&[1.0; 5]), Ok(Paper));
    }

    #[test]
    fn test_single_label_always_wins() {
        let mut knn = KnnClassifier::new(3);
        knn.add_example(vec![0.0, 1.0], Scissors).unwrap();
        assert_eq!(knn.classify(&[1.0, 0.0]), Ok(Scissors));
        assert_eq!(knn.classify(&[0.0, 0.0]), Ok(Scissors));
    }

    #[test]
    fn test_vote_tie_breaks_on_similarity() {
        let mut knn = KnnClassifier::new(2);
        knn.add_example(vec![1.0, 0.0], Paper).unwrap();
        knn.add_example(vec![0.0, 1.0], Rock).unwrap();
        assert_eq!(knn.classify(&[0.9, 0.2]), Ok(Paper));
        assert_eq!(knn.classify(&[0.2, 0.9]), Ok(Rock));
    }

    #[test]
    fn test_latest_frame_gating() {
        let mut frame = LatestFrame::new();
        assert!(!frame.is_ready());
        frame.submit(vec![1.0]);
        assert!(!frame.is_ready());
        assert_eq!(frame.infer(), None);
        frame.set_ready(true);
        assert!(frame.is_ready());
        assert_eq!(frame.infer(), Some(vec![1.0]));
        frame.set_ready(false);
        assert!(!frame.is_ready());
        frame.set_ready(true);
        assert!(!frame.is_ready());
    }
}
