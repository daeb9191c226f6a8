use asl_shared::Landmark;
use log::debug;

use super::history::{MotionKind, MotionVector};
use super::MotionStatus;
use crate::config::MotionConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChinPhase {
    Waiting,
    /// Palm reached the chin at `since_ms`.
    Started { since_ms: u64 },
    Holding { since_ms: u64 },
}

#[derive(Debug, Clone)]
pub struct ChinForwardDetector {
    config: MotionConfig,
    phase: ChinPhase,
}

impl ChinForwardDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            phase: ChinPhase::Waiting,
        }
    }

    pub fn phase(&self) -> ChinPhase {
        self.phase
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            ChinPhase::Waiting => "waiting",
            ChinPhase::Started { .. } => "started",
            ChinPhase::Holding { .. } => "holding",
        }
    }

    pub fn reset(&mut self) {
        if self.phase != ChinPhase::Waiting {
            debug!("thank you: reset from {}", self.phase_name());
        }
        self.phase = ChinPhase::Waiting;
    }

    fn is_forward(&self, vector: &MotionVector) -> bool {
        matches!(
            vector.kind,
            MotionKind::Down | MotionKind::Diagonal | MotionKind::Right
        ) && vector.magnitude >= self.config.chin_motion_min
    }

    /// Advances the state machine by one frame.
    ///
    /// `palm` is the current palm center, `chin` the chin landmark if a face
    /// was found in this frame.
    pub fn update(
        &mut self,
        vector: &MotionVector,
        palm: Landmark,
        chin: Option<Landmark>,
        now_ms: u64,
    ) -> MotionStatus {
        let distance = chin.map(|chin| palm.planar_distance_to(&chin));

        match self.phase {
            ChinPhase::Holding { since_ms } => {
                if now_ms.saturating_sub(since_ms) < self.config.chin_hold_ms {
                    return MotionStatus::Detected { confidence: 1.0 };
                }
                debug!("thank you: hold expired");
                self.phase = ChinPhase::Waiting;
                MotionStatus::Idle
            }
            ChinPhase::Started { since_ms } => {
                let elapsed = now_ms.saturating_sub(since_ms);
                if elapsed > self.config.chin_max_elapsed_ms {
                    debug!("thank you: no forward movement within {} ms", elapsed);
                    self.phase = ChinPhase::Waiting;
                    return MotionStatus::Idle;
                }
                if elapsed >= self.config.chin_min_elapsed_ms && self.is_forward(vector) {
                    debug!(
                        "thank you: {} movement after {} ms",
                        vector.kind.as_str(),
                        elapsed
                    );
                    self.phase = ChinPhase::Holding { since_ms: now_ms };
                    return MotionStatus::Detected {
                        confidence: (0.6 + vector.magnitude * 4.0).min(1.0),
                    };
                }
                // A hand covering the chin often hides the face, so only a
                // visible chin can cancel the attempt.
                if distance.is_some_and(|d| d > self.config.chin_release_distance) {
                    debug!("thank you: hand left the chin");
                    self.phase = ChinPhase::Waiting;
                    return MotionStatus::Idle;
                }
                MotionStatus::InProgress {
                    phase: "started",
                    count: 0,
                }
            }
            ChinPhase::Waiting => match distance {
                None => MotionStatus::FaceNotVisible,
                Some(d) if d <= self.config.chin_proximity => {
                    debug!("thank you: palm at chin ({:.3})", d);
                    self.phase = ChinPhase::Started { since_ms: now_ms };
                    MotionStatus::InProgress {
                        phase: "started",
                        count: 0,
                    }
                }
                Some(_) => MotionStatus::Idle,
            },
        }
    }
}
