use asl_shared::{Finger, HandPose, Landmark};
use heapless::Deque;

use crate::config::MotionConfig;

/// Frames kept for motion analysis (about one second at 30 fps).
pub const HISTORY_CAPACITY: usize = 30;

/// Per-frame summary kept for motion analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionFrame {
    pub timestamp_ms: u64,
    pub palm_center: Landmark,
    pub wrist: Landmark,
    pub index_tip: Landmark,
    pub chin: Option<Landmark>,
}

impl MotionFrame {
    pub fn from_pose(pose: &HandPose, chin: Option<Landmark>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            palm_center: pose.palm_center(),
            wrist: pose.wrist(),
            index_tip: pose.tip(Finger::Index),
            chin,
        }
    }
}

/// Direction class of the recent palm movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    /// Not enough frames yet to compare two windows.
    InsufficientData,
    Still,
    Up,
    Down,
    Left,
    Right,
    Diagonal,
}

impl MotionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::Still => "still",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Diagonal => "diagonal",
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Real movement, as opposed to stillness or missing data.
    pub fn is_moving(&self) -> bool {
        !matches!(self, Self::InsufficientData | Self::Still)
    }
}

/// Palm displacement between the two most recent windows of frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionVector {
    pub dx: f32,
    pub dy: f32,
    pub magnitude: f32,
    pub kind: MotionKind,
}

impl MotionVector {
    pub fn insufficient() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            magnitude: 0.0,
            kind: MotionKind::InsufficientData,
        }
    }

    /// Classifies a displacement in image coordinates (`y` grows downwards).
    pub fn from_delta(dx: f32, dy: f32, config: &MotionConfig) -> Self {
        let magnitude = libm::sqrtf(dx * dx + dy * dy);
        let (ax, ay) = (libm::fabsf(dx), libm::fabsf(dy));

        let kind = if magnitude < config.still_threshold {
            MotionKind::Still
        } else if ay >= ax && ay >= config.axis_threshold && ax < ay * config.diagonal_ratio {
            if dy < 0.0 {
                MotionKind::Up
            } else {
                MotionKind::Down
            }
        } else if ax > ay && ax >= config.axis_threshold && ay < ax * config.diagonal_ratio {
            if dx < 0.0 {
                MotionKind::Left
            } else {
                MotionKind::Right
            }
        } else {
            MotionKind::Diagonal
        };

        Self {
            dx,
            dy,
            magnitude,
            kind,
        }
    }
}

/// Ring buffer of the last [`HISTORY_CAPACITY`] frames, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MotionHistory {
    frames: Deque<MotionFrame, HISTORY_CAPACITY>,
}

impl MotionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: MotionFrame) {
        if self.frames.is_full() {
            self.frames.pop_front();
        }
        // Room was just made, so this cannot fail.
        let _ = self.frames.push_back(frame);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn latest(&self) -> Option<&MotionFrame> {
        self.frames.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotionFrame> {
        self.frames.iter()
    }

    /// Mean palm position of the newest `window` frames minus the mean of
    /// the `window` frames before them.
    pub fn motion_vector(&self, config: &MotionConfig) -> MotionVector {
        let window = config.window_frames.clamp(1, HISTORY_CAPACITY / 2);
        let len = self.frames.len();
        if len < window * 2 {
            return MotionVector::insufficient();
        }

        let mut older = (0.0, 0.0);
        let mut recent = (0.0, 0.0);
        for (i, frame) in self.frames.iter().skip(len - window * 2).enumerate() {
            let slot = if i < window { &mut older } else { &mut recent };
            slot.0 += frame.palm_center.x;
            slot.1 += frame.palm_center.y;
        }

        let n = window as f32;
        MotionVector::from_delta(
            recent.0 / n - older.0 / n,
            recent.1 / n - older.1 / n,
            config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn frame_at(x: f32, y: f32, t: u64) -> MotionFrame {
        MotionFrame {
            timestamp_ms: t,
            palm_center: Landmark::new(x, y, 0.0),
            wrist: Landmark::new(x, y + 0.1, 0.0),
            index_tip: Landmark::new(x, y - 0.2, 0.0),
            chin: None,
        }
    }

    #[test]
    fn test_ring_buffer_evicts_oldest() {
        let mut history = MotionHistory::new();
        for t in 0..40 {
            history.push(frame_at(0.5, 0.5, t));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next().map(|f| f.timestamp_ms), Some(10));
        assert_eq!(history.latest().map(|f| f.timestamp_ms), Some(39));
    }

    #[test]
    fn test_insufficient_history() {
        let config = MotionConfig::default();
        let mut history = MotionHistory::new();
        for t in 0..9 {
            history.push(frame_at(0.5, 0.5, t));
        }
        assert_eq!(history.motion_vector(&config).kind, MotionKind::InsufficientData);
        history.push(frame_at(0.5, 0.5, 9));
        assert_eq!(history.motion_vector(&config).kind, MotionKind::Still);
    }

    #[test]
    fn test_direction_classification() {
        let config = MotionConfig::default();
        assert_eq!(MotionVector::from_delta(0.0, -0.05, &config).kind, MotionKind::Up);
        assert_eq!(MotionVector::from_delta(0.01, 0.05, &config).kind, MotionKind::Down);
        assert_eq!(MotionVector::from_delta(-0.05, 0.0, &config).kind, MotionKind::Left);
        assert_eq!(MotionVector::from_delta(0.05, -0.01, &config).kind, MotionKind::Right);
        assert_eq!(MotionVector::from_delta(0.04, 0.04, &config).kind, MotionKind::Diagonal);
        assert_eq!(MotionVector::from_delta(0.01, 0.01, &config).kind, MotionKind::Still);
    }

    #[test]
    fn test_vector_from_moving_palm() {
        let config = MotionConfig::default();
        let mut history = MotionHistory::new();
        for t in 0..10u64 {
            history.push(frame_at(0.5, 0.6 - 0.01 * t as f32, t * 33));
        }
        let vector = history.motion_vector(&config);
        assert_eq!(vector.kind, MotionKind::Up);
        assert!((vector.dy + 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_frame_from_pose_uses_palm_center() {
        let pose = fixtures::hello();
        let frame = MotionFrame::from_pose(&pose, None, 5);
        assert_eq!(frame.palm_center, pose.palm_center());
        assert_eq!(frame.index_tip, pose.tip(Finger::Index));
    }
}
