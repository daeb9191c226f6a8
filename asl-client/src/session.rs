use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use asl_core::Recognizer;
use asl_shared::{FrameResult, Gesture, HandPose, LandmarkFrame};

use crate::training_data::TrainingDataClient;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub frames: usize,
    pub invalid_frames: usize,
    pub hand_frames: usize,
    pub captured: usize,
    pub failed_uploads: usize,
    /// How many times each gesture appeared on screen.
    pub displays: BTreeMap<Gesture, usize>,
    pub elapsed: Duration,
}

impl Summary {
    pub fn frames_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Frames: {} ({} with a hand, {} invalid)",
            self.frames, self.hand_frames, self.invalid_frames
        )?;
        if self.captured > 0 {
            writeln!(
                f,
                "Captured samples: {} ({} uploads failed)",
                self.captured, self.failed_uploads
            )?;
        }
        for (gesture, count) in &self.displays {
            writeln!(f, "  {:<12} shown {} time(s)", gesture.name(), count)?;
        }
        write!(f, "Throughput: {:.0} frames/s", self.frames_per_second())
    }
}

pub struct Session {
    recognizer: Recognizer,
    capture: Option<Gesture>,
    uploader: Option<TrainingDataClient>,
    shown: Option<Gesture>,
    summary: Summary,
}

impl Session {
    pub fn new(recognizer: Recognizer) -> Self {
        Self {
            recognizer,
            capture: None,
            uploader: None,
            shown: None,
            summary: Summary::default(),
        }
    }

    /// Store every hand frame as a sample of `gesture`, uploading it when a
    /// client is given.
    pub fn capture_as(mut self, gesture: Gesture, uploader: Option<TrainingDataClient>) -> Self {
        self.capture = Some(gesture);
        self.uploader = uploader;
        self
    }

    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Resolves one frame. Invalid frames are counted and skipped.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Option<FrameResult> {
        self.summary.frames += 1;

        let pose = match frame.hand_pose() {
            Ok(pose) => pose,
            Err(e) => {
                log::warn!("Skipping frame at {} ms: {}", frame.timestamp_ms, e);
                self.summary.invalid_frames += 1;
                return None;
            }
        };
        if let Some(pose) = pose.as_ref() {
            self.summary.hand_frames += 1;
            if let Some(gesture) = self.capture {
                self.capture_sample(gesture, pose);
            }
        }

        let result = self
            .recognizer
            .resolve_pose(pose.as_ref(), frame.chin(), frame.timestamp_ms);

        if result.gesture != self.shown {
            match result.gesture {
                Some(gesture) => {
                    log::info!(
                        "{} ms: {} ({:.0}%)",
                        frame.timestamp_ms,
                        gesture,
                        result.confidence * 100.0
                    );
                    *self.summary.displays.entry(gesture).or_default() += 1;
                }
                None => log::info!("{} ms: no gesture", frame.timestamp_ms),
            }
            self.shown = result.gesture;
        }
        if let Some(feedback) = result.feedback {
            log::debug!("{} ms: {}", frame.timestamp_ms, feedback);
        }
        Some(result)
    }

    fn capture_sample(&mut self, gesture: Gesture, pose: &HandPose) {
        let count = self.recognizer.capture_sample(gesture, *pose);
        self.summary.captured += 1;
        log::debug!("Captured {} sample #{}", gesture, count);

        if let Some(uploader) = &self.uploader {
            if let Err(e) = uploader.upload(gesture, pose) {
                log::warn!("Failed to upload {} sample: {:#}", gesture, e);
                self.summary.failed_uploads += 1;
            }
        }
    }

    pub fn finish(mut self, elapsed: Duration) -> Summary {
        self.summary.elapsed = elapsed;
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asl_shared::Landmark;

    fn frame(t: u64, hand: Option<Vec<Landmark>>) -> LandmarkFrame {
        LandmarkFrame {
            timestamp_ms: t,
            hand,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_frames_are_counted() {
        let mut session = Session::new(Recognizer::default());
        assert!(session
            .process(&frame(0, Some(vec![Landmark::default(); 20])))
            .is_none());
        assert!(session.process(&frame(33, None)).is_some());

        let summary = session.finish(Duration::from_secs(1));
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.invalid_frames, 1);
        assert_eq!(summary.hand_frames, 0);
    }

    #[test]
    fn test_capture_mode_stores_samples() {
        let mut session = Session::new(Recognizer::default()).capture_as(Gesture::Okay, None);
        let hand: Vec<Landmark> = (0..21)
            .map(|i| Landmark::new(0.3 + i as f32 * 0.01, 0.5, 0.0))
            .collect();
        for t in 0..3 {
            session.process(&frame(t * 33, Some(hand.clone())));
        }
        assert_eq!(session.recognizer().samples().count(Gesture::Okay), 3);
        assert_eq!(session.summary().captured, 3);
    }

    #[test]
    fn test_summary_throughput() {
        let summary = Summary {
            frames: 300,
            elapsed: Duration::from_secs(2),
            ..Default::default()
        };
        assert_eq!(summary.frames_per_second(), 150.0);
        assert!(summary.to_string().contains("150 frames/s"));
    }
}
