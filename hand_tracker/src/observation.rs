//! Per-frame hand observations, before identity is assigned.

use glam::Vec2;
use hand_geometry::{CameraMapping, HandLandmarks, Landmark};

use crate::gesture::GestureLabel;

/// One detected hand in one frame.  Carries no identity.
#[derive(Clone, Debug, PartialEq)]
pub struct RawObservation {
    /// Scene position in `[0, 1]²`.
    pub position:  Vec2,
    pub gesture:   GestureLabel,
    pub thickness: f32,
    pub landmarks: HandLandmarks,
}

impl RawObservation {
    /// Build from a detector skeleton: the anchor landmark is run through
    /// `mapping`; thickness is measured in raw detector space.
    ///
    /// Returns `None` when the detector delivered fewer than 21 points.
    pub fn from_landmarks(
        points:  &[Landmark],
        gesture: GestureLabel,
        mapping: &CameraMapping,
    ) -> Option<Self> {
        let landmarks = HandLandmarks::from_slice(points)?;
        Some(RawObservation {
            position:  mapping.to_scene(landmarks.anchor()),
            gesture,
            thickness: landmarks.thickness(),
            landmarks,
        })
    }

    /// An observation with only a position and label (no skeleton).
    pub fn at(position: Vec2, gesture: GestureLabel) -> Self {
        RawObservation {
            position,
            gesture,
            thickness: 1.0,
            landmarks: HandLandmarks::default(),
        }
    }
}
