//! LeapMotion hardware as a landmark detector.
//!
//! Leap reports joints in millimetres relative to the device.  They are
//! projected onto a normalized image plane (x right, y down) covering the
//! interaction box above the sensor, then laid out in the usual 21-point
//! order.  Leap has no gesture recognizer of its own, so a category name is
//! derived from finger extension.

use std::time::Duration;

use hand_geometry::{Landmark, LANDMARK_COUNT, WRIST};
use leaprs::{Connection, ConnectionConfig, Digit, Event, Hand};
use log::info;

use crate::detector::{Detection, Detector};
use crate::error::DetectorError;

// Interaction box, mm.
const X_HALF_SPAN: f32 = 200.0;
const Y_FLOOR:     f32 = 80.0;
const Y_SPAN:      f32 = 350.0;

const POLL_MS:        u32 = 5;
const POLLS_PER_CALL: usize = 8;

// Ratio of base-to-tip distance over a typical 80 mm finger.
const EXTENDED: f32 = 0.6;
const CURLED:   f32 = 0.35;

pub struct LeapDetector {
    connection: Connection,
    last:       Vec<Detection>,
}

impl LeapDetector {
    /// Connect to the LeapC service.  Fails with `Unavailable` when the
    /// service or device is missing.
    pub fn open() -> Result<Self, DetectorError> {
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|_| DetectorError::Unavailable)?;
        connection.open().map_err(|_| DetectorError::Unavailable)?;
        info!("[leap] connection open");
        Ok(LeapDetector { connection, last: Vec::new() })
    }
}

impl Detector for LeapDetector {
    fn has_capture_source(&self) -> bool {
        true
    }

    /// Drain a few messages and return the newest tracking frame; if none
    /// arrived, the previous frame's hands are reported again.
    fn detect(&mut self, _now: Duration) -> Result<Vec<Detection>, DetectorError> {
        for _ in 0..POLLS_PER_CALL {
            let msg = match self.connection.poll(POLL_MS) {
                Ok(m)  => m,
                Err(_) => break,
            };
            if let Event::Tracking(frame) = msg.event() {
                self.last = frame.hands().map(|h| hand_to_detection(&h)).collect();
            }
        }
        Ok(self.last.clone())
    }
}

fn project(x: f32, y: f32, z: f32) -> Landmark {
    Landmark::new(
        (x + X_HALF_SPAN) / (2.0 * X_HALF_SPAN),
        1.0 - (y - Y_FLOOR) / Y_SPAN,
        z / (2.0 * X_HALF_SPAN),
    )
}

fn hand_to_detection(hand: &Hand) -> Detection {
    let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];

    let palm = hand.palm().position();
    landmarks[WRIST] = project(palm.x, palm.y, palm.z);

    let mut extension = [0.0f32; 5];
    for (d, digit) in hand.digits().enumerate().take(5) {
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        for (k, j) in joints.iter().enumerate() {
            landmarks[1 + 4 * d + k] = project(j.x, j.y, j.z);
        }
        extension[d] = finger_extension(&digit);
    }

    Detection::with_landmarks(landmarks, classify(&extension))
}

fn finger_extension(digit: &Digit) -> f32 {
    let base = digit.metacarpal().prev_joint();
    let tip  = digit.distal().next_joint();
    let dx   = tip.x - base.x;
    let dy   = tip.y - base.y;
    let dz   = tip.z - base.z;
    ((dx * dx + dy * dy + dz * dz).sqrt() / 80.0).clamp(0.0, 1.0)
}

/// Thumb, index, middle, ring, pinky extension → detector category name.
fn classify(ext: &[f32; 5]) -> &'static str {
    let fingers = &ext[1..];
    if fingers.iter().all(|&e| e < CURLED) {
        "Closed_Fist"
    } else if fingers.iter().all(|&e| e > EXTENDED) {
        "Open_Palm"
    } else if ext[1] > EXTENDED && fingers[1..].iter().all(|&e| e < CURLED) {
        "Pointing_Up"
    } else if ext[1] > EXTENDED && ext[2] > EXTENDED && ext[3] < CURLED && ext[4] < CURLED {
        "Victory"
    } else {
        "None"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_from_extension() {
        assert_eq!(classify(&[0.5, 0.1, 0.1, 0.1, 0.1]), "Closed_Fist");
        assert_eq!(classify(&[0.9, 0.9, 0.9, 0.9, 0.9]), "Open_Palm");
        assert_eq!(classify(&[0.2, 0.9, 0.1, 0.1, 0.1]), "Pointing_Up");
        assert_eq!(classify(&[0.2, 0.9, 0.9, 0.1, 0.1]), "Victory");
        assert_eq!(classify(&[0.5, 0.5, 0.5, 0.5, 0.5]), "None");
    }

    #[test]
    fn centre_of_box_projects_to_centre() {
        let lm = project(0.0, Y_FLOOR + Y_SPAN / 2.0, 0.0);
        assert!((lm.x - 0.5).abs() < 1e-6);
        assert!((lm.y - 0.5).abs() < 1e-6);
    }
}
