pub mod chin;
pub mod history;
pub mod reversal;

use asl_shared::{HandPose, Landmark};
use log::trace;

use crate::config::MotionConfig;

pub use chin::{ChinForwardDetector, ChinPhase};
pub use history::{MotionFrame, MotionHistory, MotionKind, MotionVector, HISTORY_CAPACITY};
pub use reversal::{Axis, ReversalDetector, ReversalPhase, ReversalRules};

/// Result of advancing one motion detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionStatus {
    Idle,
    /// Movement started but not complete; `count` is the reversals so far.
    InProgress { phase: &'static str, count: u8 },
    Detected { confidence: f32 },
    /// Thank You needs the chin and no face was found.
    FaceNotVisible,
}

impl MotionStatus {
    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }

    /// Confidence of a detection, 0 otherwise.
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Detected { confidence } => *confidence,
            _ => 0.0,
        }
    }

    pub fn count(&self) -> u8 {
        match self {
            Self::InProgress { count, .. } => *count,
            _ => 0,
        }
    }
}

/// Palm history plus the knock, wave and chin-forward state machines.
#[derive(Debug, Clone)]
pub struct MotionTracker {
    config: MotionConfig,
    history: MotionHistory,
    vector: MotionVector,
    knock: ReversalDetector,
    wave: ReversalDetector,
    chin: ChinForwardDetector,
}

impl MotionTracker {
    pub fn new(config: MotionConfig) -> Self {
        let knock = ReversalDetector::new(
            "yes",
            "tracking",
            ReversalRules {
                axis: Axis::Vertical,
                required: config.knock_reversals,
                hold_ms: config.knock_hold_ms,
                still_timeout_ms: config.knock_still_timeout_ms,
            },
        );
        let wave = ReversalDetector::new(
            "hello",
            "waving",
            ReversalRules {
                axis: Axis::Horizontal,
                required: config.wave_reversals,
                hold_ms: config.wave_hold_ms,
                still_timeout_ms: config.wave_still_timeout_ms,
            },
        );
        Self {
            config,
            history: MotionHistory::new(),
            vector: MotionVector::insufficient(),
            knock,
            wave,
            chin: ChinForwardDetector::new(config),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Records a frame. A frame without a hand wipes all motion state.
    pub fn track(&mut self, pose: Option<&HandPose>, chin: Option<Landmark>, now_ms: u64) {
        let Some(pose) = pose else {
            self.reset();
            return;
        };

        self.history
            .push(MotionFrame::from_pose(pose, chin, now_ms));
        self.vector = self.history.motion_vector(&self.config);
        trace!(
            "motion at {}: {} dx={:.4} dy={:.4} |{:.4}|",
            now_ms,
            self.vector.kind.as_str(),
            self.vector.dx,
            self.vector.dy,
            self.vector.magnitude
        );
    }

    /// Motion vector of the most recently tracked frame.
    pub fn motion_vector(&self) -> MotionVector {
        self.vector
    }

    pub fn history(&self) -> &MotionHistory {
        &self.history
    }

    /// Knock: a fist bouncing up and down.
    pub fn detect_yes(&mut self, now_ms: u64) -> MotionStatus {
        if self.history.is_empty() {
            return MotionStatus::Idle;
        }
        self.knock.update(&self.vector, now_ms)
    }

    /// Wave: an open hand swinging side to side.
    pub fn detect_hello(&mut self, now_ms: u64) -> MotionStatus {
        if self.history.is_empty() {
            return MotionStatus::Idle;
        }
        self.wave.update(&self.vector, now_ms)
    }

    /// Flat hand from the chin forward and down.
    pub fn detect_thank_you(&mut self, now_ms: u64) -> MotionStatus {
        let Some(frame) = self.history.latest() else {
            return MotionStatus::Idle;
        };
        let (palm, chin) = (frame.palm_center, frame.chin);
        self.chin.update(&self.vector, palm, chin, now_ms)
    }

    pub fn yes_phase(&self) -> ReversalPhase {
        self.knock.phase()
    }

    /// Phase names of the knock, wave and chin machines, for diagnostics.
    pub fn phase_names(&self) -> [&'static str; 3] {
        [
            self.knock.phase_name(),
            self.wave.phase_name(),
            self.chin.phase_name(),
        ]
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.vector = MotionVector::insufficient();
        self.knock.reset();
        self.wave.reset();
        self.chin.reset();
    }
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    /// Fist frames moving vertically by `step` per frame.
    fn knock_frames(tracker: &mut MotionTracker, start_ms: u64, steps: &[(usize, f32)]) -> (u64, bool) {
        let mut t = start_ms;
        let mut y = 0.0;
        let mut detected = false;
        for &(frames, step) in steps {
            for _ in 0..frames {
                y += step;
                let pose = fixtures::fist().translated(0.0, y, 0.0);
                tracker.track(Some(&pose), None, t);
                detected |= tracker.detect_yes(t).is_detected();
                t += 33;
            }
        }
        (t, detected)
    }

    #[test]
    fn test_static_fist_never_detects_yes() {
        let mut tracker = MotionTracker::default();
        let (_, detected) = knock_frames(&mut tracker, 0, &[(90, 0.0)]);
        assert!(!detected);
        assert_eq!(tracker.yes_phase(), ReversalPhase::Waiting);
    }

    #[test]
    fn test_knock_detected() {
        let mut tracker = MotionTracker::default();
        let (_, detected) = knock_frames(
            &mut tracker,
            0,
            &[(10, 0.0), (8, -0.02), (8, 0.02), (8, -0.02)],
        );
        assert!(detected);
        assert!(matches!(tracker.yes_phase(), ReversalPhase::Holding { reversals: 2, .. }));
    }

    #[test]
    fn test_brisk_knock_needs_smaller_window() {
        let brisk = [
            (10, 0.0),
            (3, -0.03),
            (3, 0.03),
            (3, -0.03),
            (3, 0.03),
            (3, -0.03),
            (3, 0.03),
        ];
        let mut tracker = MotionTracker::default();
        let (_, detected) = knock_frames(&mut tracker, 0, &brisk);
        assert!(!detected);

        let config = MotionConfig {
            window_frames: 3,
            ..MotionConfig::default()
        };
        let mut tracker = MotionTracker::new(config);
        let (_, detected) = knock_frames(&mut tracker, 0, &brisk);
        assert!(detected);
    }

    #[test]
    fn test_wave_detected() {
        let mut tracker = MotionTracker::default();
        let mut t = 0;
        let mut x = 0.0;
        let mut detected = false;
        for (frames, step) in [(10, 0.0), (8, -0.02), (8, 0.02)] {
            for _ in 0..frames {
                x += step;
                let pose = fixtures::hello().translated(x, 0.0, 0.0);
                tracker.track(Some(&pose), None, t);
                detected |= tracker.detect_hello(t).is_detected();
                t += 33;
            }
        }
        assert!(detected);
    }

    #[test]
    fn test_hand_loss_resets_everything() {
        let mut tracker = MotionTracker::default();
        knock_frames(&mut tracker, 0, &[(10, 0.0), (8, -0.02), (4, 0.02)]);
        assert!(matches!(tracker.yes_phase(), ReversalPhase::Active { .. }));
        assert!(!tracker.history().is_empty());

        tracker.track(None, None, 5000);
        assert!(tracker.history().is_empty());
        assert_eq!(tracker.motion_vector().kind, MotionKind::InsufficientData);
        assert_eq!(tracker.phase_names(), ["waiting", "waiting", "waiting"]);
    }

    #[test]
    fn test_thank_you_without_face() {
        let mut tracker = MotionTracker::default();
        tracker.track(Some(&fixtures::hello()), None, 0);
        assert_eq!(tracker.detect_thank_you(0), MotionStatus::FaceNotVisible);
    }

    #[test]
    fn test_detectors_idle_before_any_frame() {
        let mut tracker = MotionTracker::default();
        assert_eq!(tracker.detect_yes(0), MotionStatus::Idle);
        assert_eq!(tracker.detect_hello(0), MotionStatus::Idle);
        assert_eq!(tracker.detect_thank_you(0), MotionStatus::Idle);
    }
}
