use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use asl_shared::{Gesture, HandPose};

use crate::config::ScorerConfig;

/// Anything that can rate how well a pose fits a gesture.
///
/// The sample scorer is always available; a learned model can sit behind the
/// same interface and report itself unavailable until it is loaded.
pub trait PoseScorer {
    /// Confidence in `[0, 1]`.
    fn score(&self, pose: &HandPose, gesture: Option<Gesture>) -> f32;

    fn is_available(&self) -> bool {
        true
    }
}

/// Append-only collection of captured poses per gesture.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: BTreeMap<Gesture, Vec<HandPose>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample and returns how many the gesture now has.
    pub fn capture(&mut self, gesture: Gesture, pose: HandPose) -> usize {
        let samples = self.samples.entry(gesture).or_default();
        samples.push(pose);
        samples.len()
    }

    pub fn samples(&self, gesture: Gesture) -> &[HandPose] {
        self.samples
            .get(&gesture)
            .map(|samples| samples.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, gesture: Gesture) -> usize {
        self.samples(gesture).len()
    }

    pub fn total(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Gestures with at least one sample, with their counts.
    pub fn counts(&self) -> impl Iterator<Item = (Gesture, usize)> + '_ {
        self.samples
            .iter()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(gesture, samples)| (*gesture, samples.len()))
    }
}

/// Nearest-sample scorer.
///
/// Cost is O(samples x 21) per call with a linear scan; fine for the tens of
/// samples a user records by hand, not for bulk datasets.
#[derive(Debug, Clone, Default)]
pub struct SampleScorer {
    store: SampleStore,
    config: ScorerConfig,
}

impl SampleScorer {
    pub fn new(store: SampleStore, config: ScorerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn capture(&mut self, gesture: Gesture, pose: HandPose) -> usize {
        self.store.capture(gesture, pose)
    }

    /// Smallest mean landmark distance to any sample of the gesture.
    pub fn nearest_distance(&self, pose: &HandPose, gesture: Gesture) -> Option<f32> {
        self.store
            .samples(gesture)
            .iter()
            .map(|sample| pose.mean_distance(sample))
            .fold(None, |best, d| match best {
                Some(b) if b <= d => Some(b),
                _ => Some(d),
            })
    }
}

impl PoseScorer for SampleScorer {
    fn score(&self, pose: &HandPose, gesture: Option<Gesture>) -> f32 {
        let Some(gesture) = gesture else {
            return 0.0;
        };
        match self.nearest_distance(pose, gesture) {
            Some(distance) => (1.0 - distance * self.config.sensitivity).clamp(0.0, 1.0),
            None => self.config.unverified_confidence,
        }
    }
}
