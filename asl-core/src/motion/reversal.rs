use log::debug;

use super::history::{MotionKind, MotionVector};
use super::MotionStatus;

/// Axis along which reversals are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    fn accepts(self, kind: MotionKind) -> bool {
        match self {
            Axis::Vertical => kind.is_vertical(),
            Axis::Horizontal => kind.is_horizontal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReversalPhase {
    Waiting,
    /// Moving along the axis; `reversals` direction changes seen so far.
    Active {
        direction: MotionKind,
        reversals: u8,
        last_motion_ms: u64,
    },
    /// Completed; reported as detected until the hold window runs out.
    Holding { since_ms: u64, reversals: u8 },
}

/// Timing and count parameters of one reversal detector.
#[derive(Debug, Clone, Copy)]
pub struct ReversalRules {
    pub axis: Axis,
    pub required: u8,
    pub hold_ms: u64,
    pub still_timeout_ms: u64,
}

/// Counts direction reversals along one axis until enough have been seen.
#[derive(Debug, Clone)]
pub struct ReversalDetector {
    name: &'static str,
    active_phase: &'static str,
    rules: ReversalRules,
    phase: ReversalPhase,
}

impl ReversalDetector {
    pub fn new(name: &'static str, active_phase: &'static str, rules: ReversalRules) -> Self {
        Self {
            name,
            active_phase,
            rules,
            phase: ReversalPhase::Waiting,
        }
    }

    pub fn phase(&self) -> ReversalPhase {
        self.phase
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            ReversalPhase::Waiting => "waiting",
            ReversalPhase::Active { .. } => self.active_phase,
            ReversalPhase::Holding { .. } => "holding",
        }
    }

    pub fn reversals(&self) -> u8 {
        match self.phase {
            ReversalPhase::Waiting => 0,
            ReversalPhase::Active { reversals, .. } | ReversalPhase::Holding { reversals, .. } => {
                reversals
            }
        }
    }

    pub fn reset(&mut self) {
        if self.phase != ReversalPhase::Waiting {
            debug!("{}: reset from {}", self.name, self.phase_name());
        }
        self.phase = ReversalPhase::Waiting;
    }

    fn completion_confidence(&self, reversals: u8) -> f32 {
        (0.6 + 0.2 * reversals as f32).min(1.0)
    }

    /// Advances the state machine by one frame.
    pub fn update(&mut self, vector: &MotionVector, now_ms: u64) -> MotionStatus {
        match self.phase {
            ReversalPhase::Holding { since_ms, .. } => {
                if now_ms.saturating_sub(since_ms) < self.rules.hold_ms {
                    return MotionStatus::Detected { confidence: 1.0 };
                }
                debug!("{}: hold expired", self.name);
                self.phase = ReversalPhase::Waiting;
                return MotionStatus::Idle;
            }
            ReversalPhase::Active { last_motion_ms, .. }
                if now_ms.saturating_sub(last_motion_ms) > self.rules.still_timeout_ms =>
            {
                debug!(
                    "{}: no movement for {} ms, starting over",
                    self.name,
                    now_ms - last_motion_ms
                );
                self.phase = ReversalPhase::Waiting;
            }
            _ => {}
        }

        let along_axis = self.rules.axis.accepts(vector.kind);
        match self.phase {
            ReversalPhase::Waiting if along_axis => {
                debug!("{}: started moving {}", self.name, vector.kind.as_str());
                self.phase = ReversalPhase::Active {
                    direction: vector.kind,
                    reversals: 0,
                    last_motion_ms: now_ms,
                };
                self.in_progress(0)
            }
            ReversalPhase::Waiting => MotionStatus::Idle,
            ReversalPhase::Active {
                direction,
                reversals,
                ..
            } if along_axis => {
                let reversals = if vector.kind != direction {
                    let count = reversals.saturating_add(1);
                    debug!("{}: reversal {} ({})", self.name, count, vector.kind.as_str());
                    count
                } else {
                    reversals
                };

                if reversals >= self.rules.required {
                    debug!("{}: complete after {} reversals", self.name, reversals);
                    self.phase = ReversalPhase::Holding {
                        since_ms: now_ms,
                        reversals,
                    };
                    MotionStatus::Detected {
                        confidence: self.completion_confidence(reversals),
                    }
                } else {
                    self.phase = ReversalPhase::Active {
                        direction: vector.kind,
                        reversals,
                        last_motion_ms: now_ms,
                    };
                    self.in_progress(reversals)
                }
            }
            ReversalPhase::Active {
                direction,
                reversals,
                last_motion_ms,
            } => {
                // Off-axis movement keeps the attempt alive, stillness does not.
                let last_motion_ms = if vector.kind.is_moving() {
                    now_ms
                } else {
                    last_motion_ms
                };
                self.phase = ReversalPhase::Active {
                    direction,
                    reversals,
                    last_motion_ms,
                };
                self.in_progress(reversals)
            }
            ReversalPhase::Holding { .. } => MotionStatus::Detected { confidence: 1.0 },
        }
    }

    fn in_progress(&self, count: u8) -> MotionStatus {
        MotionStatus::InProgress {
            phase: self.active_phase,
            count,
        }
    }
}
