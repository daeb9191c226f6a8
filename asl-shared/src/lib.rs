#![cfg_attr(not(feature = "std"), no_std)]

//! Data model shared by the recognizer core and its hosts.
//!
//! Everything here is plain data: landmarks as produced by the hand/face
//! landmark provider, the closed set of recognizable gestures, and the
//! per-frame result handed to the presentation layer.

extern crate alloc;

mod frame;
mod gesture;
mod landmark;

pub use frame::{Feedback, FrameResult, LandmarkFrame, RecognizerSettings};
pub use gesture::Gesture;
pub use landmark::{Finger, HandPose, Landmark, FACE_CHIN_LANDMARK, HAND_LANDMARK_COUNT};

use thiserror::Error;

/// Errors raised while turning raw provider data into typed values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DataError {
    #[error("expected {expected} hand landmarks, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("unknown gesture name")]
    UnknownGesture,
}
