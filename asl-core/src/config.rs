use asl_shared::{Gesture, RecognizerSettings};
use heapless::LinearMap;

/// Thresholds for the static pose predicates
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Horizontal tip-to-IP offset beyond which the thumb counts as extended.
    pub thumb_extension_x: f32,
    /// How far the thumb tip must clear its joints for thumbs up/down.
    pub thumb_vertical_margin: f32,
    /// Thumb tip to index base distance for a thumb wrapped over a fist.
    pub fist_thumb_wrap_distance: f32,
    /// Thumb tip to thumb MCP distance for a thumb tucked into a fist.
    pub fist_thumb_tuck_distance: f32,
    /// Max horizontal tip-to-PIP offset of an upright pointing index.
    pub pointing_vertical_tolerance: f32,
    /// Max horizontal gap between index and middle tips for "No".
    pub no_tip_spread: f32,
    /// Max index-to-thumb tip distance for the tapping variant of "No".
    pub no_thumb_contact: f32,
    /// Max thumb-to-index tip distance that closes the "Okay" ring.
    pub okay_ring_distance: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            thumb_extension_x: 0.02,
            thumb_vertical_margin: 0.02,
            fist_thumb_wrap_distance: 0.07,
            fist_thumb_tuck_distance: 0.06,
            pointing_vertical_tolerance: 0.03,
            no_tip_spread: 0.04,
            no_thumb_contact: 0.05,
            okay_ring_distance: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScorerConfig {
    /// Confidence lost per unit of mean landmark distance.
    pub sensitivity: f32,
    /// Confidence reported when no samples exist for the gesture.
    pub unverified_confidence: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            sensitivity: 5.0,
            unverified_confidence: 0.5,
        }
    }
}

/// Motion thresholds. Distances are normalized image units, durations are
/// milliseconds.
///
/// The motion vector compares two windows of `window_frames` frames, so a
/// stroke shorter than the window is averaged away. With the default of 5 a
/// knock needs strokes of about 5 frames each (a full up and down cycle of
/// roughly 10 frames, a third of a second at 30 fps). Brisker knocks need a
/// smaller window.
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    /// Frames averaged on each side of the motion vector.
    pub window_frames: usize,
    pub still_threshold: f32,
    /// Minimum displacement along the dominant axis for a directed motion.
    pub axis_threshold: f32,
    /// Minor/major axis ratio above which a motion is diagonal.
    pub diagonal_ratio: f32,

    pub knock_reversals: u8,
    pub knock_hold_ms: u64,
    pub knock_still_timeout_ms: u64,

    pub wave_reversals: u8,
    pub wave_hold_ms: u64,
    pub wave_still_timeout_ms: u64,

    /// Palm-to-chin distance that starts Thank You.
    pub chin_proximity: f32,
    /// Palm-to-chin distance that abandons a started Thank You.
    pub chin_release_distance: f32,
    /// Minimum motion magnitude for the forward movement.
    pub chin_motion_min: f32,
    pub chin_min_elapsed_ms: u64,
    pub chin_max_elapsed_ms: u64,
    pub chin_hold_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            window_frames: 5,
            still_threshold: 0.02,
            axis_threshold: 0.015,
            diagonal_ratio: 0.6,
            knock_reversals: 2,
            knock_hold_ms: 1000,
            knock_still_timeout_ms: 1000,
            wave_reversals: 1,
            wave_hold_ms: 2000,
            wave_still_timeout_ms: 1000,
            chin_proximity: 0.15,
            chin_release_distance: 0.3,
            chin_motion_min: 0.03,
            chin_min_elapsed_ms: 100,
            chin_max_elapsed_ms: 2000,
            chin_hold_ms: 1500,
        }
    }
}

/// Display stabilization policy
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Minimum time a gesture stays displayed once shown. Missing entries are 0.
    pub min_display_ms: LinearMap<Gesture, u64, 9>,
    /// Keep the last gesture on screen across frames with no match.
    pub persistence: bool,
    /// How long the last gesture survives after the hand leaves the frame.
    pub hand_loss_persistence_ms: u64,
}

impl DisplayConfig {
    pub fn min_display_for(&self, gesture: Gesture) -> u64 {
        self.min_display_ms.get(&gesture).copied().unwrap_or(0)
    }

    pub fn set_min_display(&mut self, gesture: Gesture, ms: u64) {
        // Capacity covers every gesture, so the insert cannot overflow.
        let _ = self.min_display_ms.insert(gesture, ms);
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut config = Self {
            min_display_ms: LinearMap::new(),
            persistence: true,
            hand_loss_persistence_ms: 500,
        };
        config.set_min_display(Gesture::Yes, 1000);
        config
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecognizerConfig {
    pub classifier: ClassifierConfig,
    pub scorer: ScorerConfig,
    pub motion: MotionConfig,
    pub display: DisplayConfig,
}

impl RecognizerConfig {
    /// Defaults overridden by the user-facing settings.
    pub fn from_settings(settings: &RecognizerSettings) -> Self {
        let mut config = Self::default();
        config.scorer.sensitivity = settings.sample_sensitivity;
        config.motion.still_threshold = settings.stillness_threshold;
        config.motion.knock_hold_ms = settings.knock_hold_ms;
        config.motion.wave_hold_ms = settings.wave_hold_ms;
        config.motion.wave_reversals = settings.wave_reversals.max(1);
        config.motion.chin_proximity = settings.chin_proximity;
        config.display.persistence = settings.gesture_persistence;
        config
            .display
            .set_min_display(Gesture::Yes, settings.yes_min_display_ms);
        config
    }
}
