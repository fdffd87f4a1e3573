//! Landmark detectors — the opaque per-frame recognizer behind the loop.
//!
//! The [`InputManager`](crate::InputManager) only needs two things from a
//! detector: whether a capture source exists at all (otherwise it falls back
//! to pointer input) and, once per cycle, the hands it currently sees.
//!
//! * [`NoCapture`] — no camera; always selects pointer mode.
//! * [`ScriptedDetector`] — replays queued frames; used by tests and demos.
//! * `LeapDetector` — LeapMotion hardware (feature `leap`).

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec2;
use hand_geometry::{Landmark, INDEX_MCP, LANDMARK_COUNT, WRIST};

use crate::error::DetectorError;

// ════════════════════════════════════════════════════════════════════════════
// Detection
// ════════════════════════════════════════════════════════════════════════════

/// One hand as the recognizer reports it: raw image-space landmarks and the
/// top gesture category name.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub landmarks: Vec<Landmark>,
    pub category:  String,
}

impl Detection {
    /// A minimal skeleton whose index knuckle sits at `raw` (detector space,
    /// before mirroring) with the wrist just below it.
    pub fn at(raw: Vec2, category: &str) -> Self {
        let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        landmarks[INDEX_MCP] = Landmark::new(raw.x, raw.y, 0.0);
        landmarks[WRIST]     = Landmark::new(raw.x, raw.y + 0.1, 0.0);
        Detection { landmarks, category: category.to_string() }
    }

    pub fn with_landmarks(landmarks: Vec<Landmark>, category: &str) -> Self {
        Detection { landmarks, category: category.to_string() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detector trait
// ════════════════════════════════════════════════════════════════════════════

pub trait Detector {
    /// Whether a camera (or equivalent) is attached.  Checked once per
    /// `start_tracking`.
    fn has_capture_source(&self) -> bool;

    /// Recognize the hands visible at `now`.  May be slow; the loop waits.
    fn detect(&mut self, now: Duration) -> Result<Vec<Detection>, DetectorError>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn has_capture_source(&self) -> bool {
        (**self).has_capture_source()
    }

    fn detect(&mut self, now: Duration) -> Result<Vec<Detection>, DetectorError> {
        (**self).detect(now)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NoCapture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy)]
pub struct NoCapture;

impl Detector for NoCapture {
    fn has_capture_source(&self) -> bool {
        false
    }

    fn detect(&mut self, _now: Duration) -> Result<Vec<Detection>, DetectorError> {
        Err(DetectorError::Unavailable)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedDetector
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a queue of canned results, one per `detect` call.  An empty
/// queue reports no hands.
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    frames: VecDeque<Result<Vec<Detection>, DetectorError>>,
    calls:  usize,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, hands: Vec<Detection>) -> &mut Self {
        self.frames.push_back(Ok(hands));
        self
    }

    pub fn push_error(&mut self, err: DetectorError) -> &mut Self {
        self.frames.push_back(Err(err));
        self
    }

    /// Queue the same frame `n` times.
    pub fn repeat_frame(&mut self, hands: Vec<Detection>, n: usize) -> &mut Self {
        for _ in 0..n {
            self.frames.push_back(Ok(hands.clone()));
        }
        self
    }

    pub fn pending(&self) -> usize {
        self.frames.len()
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Detector for ScriptedDetector {
    fn has_capture_source(&self) -> bool {
        true
    }

    fn detect(&mut self, _now: Duration) -> Result<Vec<Detection>, DetectorError> {
        self.calls += 1;
        self.frames.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_frames_play_in_order_then_run_dry() {
        let mut d = ScriptedDetector::new();
        d.push_frame(vec![Detection::at(Vec2::new(0.5, 0.5), "Open_Palm")])
            .push_error(DetectorError::Recognition("blur".into()));

        assert_eq!(d.detect(Duration::ZERO).unwrap().len(), 1);
        assert!(d.detect(Duration::ZERO).is_err());
        assert!(d.detect(Duration::ZERO).unwrap().is_empty());
        assert_eq!(d.calls(), 3);
    }

    #[test]
    fn detection_at_places_the_knuckle() {
        let d = Detection::at(Vec2::new(0.3, 0.6), "Victory");
        assert_eq!(d.landmarks.len(), LANDMARK_COUNT);
        assert_eq!(d.landmarks[INDEX_MCP].xy(), Vec2::new(0.3, 0.6));
    }

    #[test]
    fn no_capture_has_no_source() {
        let mut d = NoCapture;
        assert!(!d.has_capture_source());
        assert_eq!(d.detect(Duration::ZERO), Err(DetectorError::Unavailable));
    }
}
