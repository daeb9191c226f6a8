use alloc::boxed::Box;
use core::fmt;

use asl_shared::{Feedback, FrameResult, Gesture, HandPose, Landmark};
use log::debug;

use crate::classifier;
use crate::config::{DisplayConfig, RecognizerConfig};
use crate::error::RecognitionError;
use crate::motion::{MotionStatus, MotionTracker};
use crate::scorer::{PoseScorer, SampleScorer, SampleStore};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shown {
    gesture: Gesture,
    confidence: f32,
    since_ms: u64,
}

/// Minimum display time, persistence and the hand-loss grace window.
#[derive(Debug, Clone)]
struct DisplayPolicy {
    config: DisplayConfig,
    shown: Option<Shown>,
    hand_lost_at: Option<u64>,
}

impl DisplayPolicy {
    fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            shown: None,
            hand_lost_at: None,
        }
    }

    fn locked(&self, shown: &Shown, now_ms: u64) -> bool {
        now_ms.saturating_sub(shown.since_ms) < self.config.min_display_for(shown.gesture)
    }

    fn keep(shown: &Shown, feedback: Option<Feedback>) -> FrameResult {
        FrameResult {
            gesture: Some(shown.gesture),
            confidence: shown.confidence,
            feedback,
        }
    }

    fn clear(&mut self) {
        if let Some(shown) = self.shown.take() {
            debug!("display: cleared {}", shown.gesture);
        }
    }

    /// Turns the label computed for a frame with a hand into what is shown.
    fn apply(&mut self, candidate: FrameResult, now_ms: u64) -> FrameResult {
        self.hand_lost_at = None;

        let Some(gesture) = candidate.gesture else {
            return match self.shown {
                Some(shown) if self.config.persistence || self.locked(&shown, now_ms) => {
                    Self::keep(&shown, candidate.feedback)
                }
                _ => {
                    self.clear();
                    candidate
                }
            };
        };

        if let Some(shown) = self.shown.as_mut() {
            if shown.gesture == gesture {
                shown.confidence = candidate.confidence;
                return candidate;
            }
        }
        if let Some(shown) = self.shown {
            if self.locked(&shown, now_ms) {
                debug!(
                    "display: {} suppressed, {} shown for {} ms",
                    gesture,
                    shown.gesture,
                    now_ms.saturating_sub(shown.since_ms)
                );
                return Self::keep(&shown, candidate.feedback);
            }
        }

        debug!("display: {} ({:.2})", gesture, candidate.confidence);
        self.shown = Some(Shown {
            gesture,
            confidence: candidate.confidence,
            since_ms: now_ms,
        });
        candidate
    }

    /// Frame without a hand: the last gesture survives a short grace window.
    fn hand_lost(&mut self, now_ms: u64) -> FrameResult {
        let lost_at = *self.hand_lost_at.get_or_insert(now_ms);
        match self.shown {
            Some(shown)
                if self.config.persistence
                    && now_ms.saturating_sub(lost_at) <= self.config.hand_loss_persistence_ms =>
            {
                Self::keep(&shown, None)
            }
            _ => {
                self.clear();
                FrameResult::empty()
            }
        }
    }

    fn reset(&mut self) {
        self.shown = None;
        self.hand_lost_at = None;
    }
}

/// Recognition session: owns the motion tracker, the sample scorer and the
/// display state for one stream of frames.
pub struct Recognizer {
    config: RecognizerConfig,
    tracker: MotionTracker,
    samples: SampleScorer,
    learned: Option<Box<dyn PoseScorer + Send>>,
    display: DisplayPolicy,
}

impl Recognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        Self::with_samples(config, SampleStore::new())
    }

    pub fn with_samples(config: RecognizerConfig, store: SampleStore) -> Self {
        Self {
            tracker: MotionTracker::new(config.motion),
            samples: SampleScorer::new(store, config.scorer),
            learned: None,
            display: DisplayPolicy::new(config.display.clone()),
            config,
        }
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn motion(&self) -> &MotionTracker {
        &self.tracker
    }

    pub fn samples(&self) -> &SampleStore {
        self.samples.store()
    }

    /// Installs a learned scorer; it is used whenever it reports itself
    /// available, with the sample scorer as fallback.
    pub fn set_learned_scorer(&mut self, scorer: Box<dyn PoseScorer + Send>) {
        self.learned = Some(scorer);
    }

    pub fn classify(&self, pose: &HandPose) -> Option<Gesture> {
        classifier::classify(pose, &self.config.classifier)
    }

    pub fn score(&self, pose: &HandPose, gesture: Option<Gesture>) -> f32 {
        let score = match &self.learned {
            Some(learned) if learned.is_available() => learned.score(pose, gesture),
            _ => self.samples.score(pose, gesture),
        };
        score.clamp(0.0, 1.0)
    }

    pub fn capture_sample(&mut self, gesture: Gesture, pose: HandPose) -> usize {
        let count = self.samples.capture(gesture, pose);
        debug!("captured {} sample {}", gesture, count);
        count
    }

    /// Validates raw landmarks, then resolves the frame.
    ///
    /// A malformed hand is rejected before any state changes.
    pub fn resolve_frame(
        &mut self,
        hand: Option<&[Landmark]>,
        chin: Option<Landmark>,
        now_ms: u64,
    ) -> Result<FrameResult, RecognitionError> {
        let pose = hand.map(HandPose::from_slice).transpose()?;
        Ok(self.resolve_pose(pose.as_ref(), chin, now_ms))
    }

    pub fn resolve_pose(
        &mut self,
        pose: Option<&HandPose>,
        chin: Option<Landmark>,
        now_ms: u64,
    ) -> FrameResult {
        self.tracker.track(pose, chin, now_ms);
        let Some(pose) = pose else {
            return self.display.hand_lost(now_ms);
        };

        let base = self.classify(pose);
        let confidence = self.score(pose, base);
        let candidate = match base {
            Some(Gesture::Hello) => self.resolve_open_hand(confidence, now_ms),
            Some(Gesture::Yes) => self.resolve_fist(now_ms),
            gesture => FrameResult {
                gesture,
                confidence: if gesture.is_some() { confidence } else { 0.0 },
                feedback: None,
            },
        };
        self.display.apply(candidate, now_ms)
    }

    /// Open hand: Thank You takes precedence over a wave, a wave over a
    /// static Hello.
    fn resolve_open_hand(&mut self, confidence: f32, now_ms: u64) -> FrameResult {
        let hello = |confidence: f32, feedback: Option<Feedback>| FrameResult {
            gesture: Some(Gesture::Hello),
            confidence,
            feedback,
        };

        let thank_you = self.tracker.detect_thank_you(now_ms);
        match thank_you {
            MotionStatus::Detected { confidence } => {
                return FrameResult {
                    gesture: Some(Gesture::ThankYou),
                    confidence,
                    feedback: None,
                }
            }
            MotionStatus::InProgress { .. } => {
                return hello(confidence, Some(Feedback::ThankYouStarted))
            }
            _ => {}
        }

        match self.tracker.detect_hello(now_ms) {
            MotionStatus::Detected { confidence } => hello(confidence, None),
            MotionStatus::InProgress { count, .. } => {
                hello(confidence, Some(Feedback::WaveInProgress { waves: count }))
            }
            _ if thank_you == MotionStatus::FaceNotVisible => {
                hello(confidence, Some(Feedback::FaceNotVisible))
            }
            _ => hello(confidence, None),
        }
    }

    /// Fist: only a completed knock is Yes.
    fn resolve_fist(&mut self, now_ms: u64) -> FrameResult {
        match self.tracker.detect_yes(now_ms) {
            MotionStatus::Detected { confidence } => FrameResult {
                gesture: Some(Gesture::Yes),
                confidence,
                feedback: None,
            },
            MotionStatus::InProgress { count, .. } => FrameResult {
                feedback: Some(Feedback::KnockInProgress { bounces: count }),
                ..FrameResult::empty()
            },
            _ => FrameResult::empty(),
        }
    }

    /// Clears motion and display state. Captured samples are kept.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.display.reset();
    }
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("config", &self.config)
            .field("tracker", &self.tracker)
            .field("samples", &self.samples.store().total())
            .field("learned", &self.learned.is_some())
            .field("shown", &self.display.shown.map(|shown| shown.gesture))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use asl_shared::DataError;

    struct FixedScorer {
        value: f32,
        available: bool,
    }

    impl PoseScorer for FixedScorer {
        fn score(&self, _pose: &HandPose, _gesture: Option<Gesture>) -> f32 {
            self.value
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn policy() -> DisplayPolicy {
        DisplayPolicy::new(DisplayConfig::default())
    }

    fn shown(gesture: Gesture) -> FrameResult {
        FrameResult {
            gesture: Some(gesture),
            confidence: 0.9,
            feedback: None,
        }
    }

    #[test]
    fn test_static_gesture_displayed() {
        let mut recognizer = Recognizer::default();
        let result = recognizer.resolve_pose(Some(&fixtures::good()), None, 0);
        assert_eq!(result.gesture, Some(Gesture::Good));
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_static_fist_is_not_yes() {
        let mut recognizer = Recognizer::default();
        for t in 0..60 {
            let result = recognizer.resolve_pose(Some(&fixtures::fist()), None, t * 33);
            assert_eq!(result.gesture, None);
        }
    }

    #[test]
    fn test_minimum_display_time() {
        let mut display = policy();
        assert_eq!(display.apply(shown(Gesture::Yes), 0).gesture, Some(Gesture::Yes));
        assert_eq!(display.apply(shown(Gesture::Good), 400).gesture, Some(Gesture::Yes));
        assert_eq!(display.apply(shown(Gesture::Good), 1100).gesture, Some(Gesture::Good));
    }

    #[test]
    fn test_zero_minimum_switches_immediately() {
        let mut display = policy();
        display.apply(shown(Gesture::Hello), 0);
        assert_eq!(display.apply(shown(Gesture::Good), 10).gesture, Some(Gesture::Good));
    }

    #[test]
    fn test_persistence_keeps_last_gesture() {
        let mut display = policy();
        display.apply(shown(Gesture::Okay), 0);
        let result = display.apply(FrameResult::empty(), 5000);
        assert_eq!(result.gesture, Some(Gesture::Okay));
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_without_persistence_no_match_clears() {
        let mut config = DisplayConfig::default();
        config.persistence = false;
        let mut display = DisplayPolicy::new(config);
        display.apply(shown(Gesture::Okay), 0);
        assert_eq!(display.apply(FrameResult::empty(), 100).gesture, None);

        // Yes still honours its minimum
        display.apply(shown(Gesture::Yes), 200);
        assert_eq!(display.apply(FrameResult::empty(), 700).gesture, Some(Gesture::Yes));
        assert_eq!(display.apply(FrameResult::empty(), 1300).gesture, None);
    }

    #[test]
    fn test_hand_loss_grace_window() {
        let mut recognizer = Recognizer::default();
        recognizer.resolve_pose(Some(&fixtures::okay()), None, 0);
        let kept = recognizer.resolve_pose(None, None, 33);
        assert_eq!(kept.gesture, Some(Gesture::Okay));
        assert!(recognizer.motion().history().is_empty());
        assert_eq!(recognizer.resolve_pose(None, None, 400).gesture, Some(Gesture::Okay));
        assert_eq!(recognizer.resolve_pose(None, None, 600).gesture, None);
    }

    #[test]
    fn test_hello_survives_one_missing_hand() {
        let mut recognizer = Recognizer::default();
        for t in 0..5 {
            let result = recognizer.resolve_pose(Some(&fixtures::hello()), None, t * 33);
            assert_eq!(result.gesture, Some(Gesture::Hello));
        }

        let result = recognizer.resolve_pose(None, None, 5 * 33);
        assert_eq!(result.gesture, Some(Gesture::Hello));
        assert!(recognizer.motion().history().is_empty());
        assert_eq!(recognizer.motion().phase_names(), ["waiting", "waiting", "waiting"]);
    }

    #[test]
    fn test_invalid_input_leaves_state_untouched() {
        let mut recognizer = Recognizer::default();
        recognizer.resolve_pose(Some(&fixtures::hello()), None, 0);
        let before = recognizer.motion().history().len();

        let short = [Landmark::default(); 20];
        let err = recognizer.resolve_frame(Some(short.as_slice()), None, 33).unwrap_err();
        assert_eq!(
            err,
            RecognitionError::InvalidInput(DataError::InvalidLandmarkCount {
                expected: 21,
                actual: 20
            })
        );
        assert_eq!(recognizer.motion().history().len(), before);
    }

    #[test]
    fn test_resolve_frame_accepts_raw_landmarks() {
        let mut recognizer = Recognizer::default();
        let pose = fixtures::i_love_you();
        let result = recognizer
            .resolve_frame(Some(pose.landmarks().as_slice()), None, 0)
            .unwrap();
        assert_eq!(result.gesture, Some(Gesture::ILoveYou));
    }

    #[test]
    fn test_learned_scorer_used_when_available() {
        let mut recognizer = Recognizer::default();
        let pose = fixtures::good();
        recognizer.set_learned_scorer(Box::new(FixedScorer {
            value: 1.7,
            available: true,
        }));
        assert_eq!(recognizer.score(&pose, Some(Gesture::Good)), 1.0);

        recognizer.set_learned_scorer(Box::new(FixedScorer {
            value: 0.1,
            available: false,
        }));
        assert_eq!(recognizer.score(&pose, Some(Gesture::Good)), 0.5);
    }

    #[test]
    fn test_captured_samples_raise_confidence() {
        let mut recognizer = Recognizer::default();
        assert_eq!(recognizer.capture_sample(Gesture::Bad, fixtures::bad()), 1);
        let result = recognizer.resolve_pose(Some(&fixtures::bad()), None, 0);
        assert_eq!(result.gesture, Some(Gesture::Bad));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_hello_without_face_reports_feedback() {
        let mut recognizer = Recognizer::default();
        let result = recognizer.resolve_pose(Some(&fixtures::hello()), None, 0);
        assert_eq!(result.gesture, Some(Gesture::Hello));
        assert_eq!(result.feedback, Some(Feedback::FaceNotVisible));
    }

    #[test]
    fn test_reset_clears_display_but_keeps_samples() {
        let mut recognizer = Recognizer::default();
        recognizer.capture_sample(Gesture::Okay, fixtures::okay());
        recognizer.resolve_pose(Some(&fixtures::okay()), None, 0);
        recognizer.reset();
        assert_eq!(recognizer.resolve_pose(Some(&fixtures::peace()), None, 10).gesture, None);
        assert_eq!(recognizer.samples().count(Gesture::Okay), 1);
    }
}
