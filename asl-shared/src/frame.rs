use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{DataError, Gesture, HandPose, Landmark};

/// Hint shown while a movement-based sign is partially performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    /// Fist is knocking but has not bounced often enough yet.
    KnockInProgress { bounces: u8 },
    /// Open hand started waving.
    WaveInProgress { waves: u8 },
    /// Hand touched the chin, waiting for the forward movement.
    ThankYouStarted,
    /// Chin-based signs cannot be tracked without a visible face.
    FaceNotVisible,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::KnockInProgress { bounces } => {
                write!(f, "Knocking... ({} bounce(s)), keep going for Yes", bounces)
            }
            Feedback::WaveInProgress { waves } => {
                write!(f, "Waving... ({} wave(s))", waves)
            }
            Feedback::ThankYouStarted => f.write_str("Now move your hand forward from the chin"),
            Feedback::FaceNotVisible => f.write_str("Face not visible"),
        }
    }
}

/// What the presentation layer should show for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub gesture: Option<Gesture>,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl FrameResult {
    pub fn empty() -> Self {
        Self {
            gesture: None,
            confidence: 0.0,
            feedback: None,
        }
    }
}

/// One recorded frame from the landmark provider.
///
/// `hand` is absent when no hand was detected. The chin can be given
/// directly or taken from a full face mesh.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LandmarkFrame {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub hand: Option<Vec<Landmark>>,
    #[serde(default)]
    pub chin: Option<Landmark>,
    #[serde(default)]
    pub face: Option<Vec<Landmark>>,
}

impl LandmarkFrame {
    /// Chin landmark, preferring the explicit one over the face mesh.
    pub fn chin(&self) -> Option<Landmark> {
        self.chin
            .or_else(|| self.face.as_deref().and_then(Landmark::chin_from_face))
    }

    /// Hand landmarks as a validated pose, `Ok(None)` when no hand is present.
    pub fn hand_pose(&self) -> Result<Option<HandPose>, DataError> {
        self.hand
            .as_deref()
            .map(HandPose::from_slice)
            .transpose()
    }

    #[cfg(feature = "std")]
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// User-tunable recognizer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognizerSettings {
    /// Slope of the distance-to-confidence mapping for stored samples.
    pub sample_sensitivity: f32,
    /// Palm displacement below which the hand counts as still.
    pub stillness_threshold: f32,
    /// Minimum time a displayed Yes stays on screen.
    pub yes_min_display_ms: u64,
    pub knock_hold_ms: u64,
    pub wave_hold_ms: u64,
    pub wave_reversals: u8,
    /// Maximum palm-to-chin distance that starts Thank You.
    pub chin_proximity: f32,
    /// Keep showing the last gesture across frames with no match.
    pub gesture_persistence: bool,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            sample_sensitivity: 5.0,
            stillness_threshold: 0.02,
            yes_min_display_ms: 1000,
            knock_hold_ms: 1000,
            wave_hold_ms: 2000,
            wave_reversals: 1,
            chin_proximity: 0.15,
            gesture_persistence: true,
        }
    }
}

#[cfg(feature = "std")]
impl RecognizerSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
