#![cfg_attr(not(feature = "std"), no_std)]

//! Gesture recognition core.
//!
//! Turns per-frame hand landmarks into ASL gestures: a rule-based pose
//! classifier, nearest-sample confidence scoring, motion state machines for
//! signs that need a movement, and an orchestrator that keeps the displayed
//! gesture stable across frames.

extern crate alloc;

pub mod classifier;
pub mod config;
mod error;
pub mod motion;
pub mod recognizer;
pub mod scorer;

#[cfg(test)]
mod fixtures;

pub use asl_shared::{Feedback, Finger, FrameResult, Gesture, HandPose, Landmark};
pub use classifier::classify;
pub use config::{ClassifierConfig, DisplayConfig, MotionConfig, RecognizerConfig, ScorerConfig};
pub use error::RecognitionError;
pub use motion::{MotionKind, MotionStatus, MotionTracker, MotionVector};
pub use recognizer::Recognizer;
pub use scorer::{PoseScorer, SampleScorer, SampleStore};
