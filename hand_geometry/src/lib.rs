//! # hand_geometry
//!
//! Pure geometry for camera-driven hand input.
//!
//! * [`Landmark`] / [`HandLandmarks`] — the 21-point hand skeleton produced by
//!   the landmark detector, in normalized image space (`x`, `y` in `[0, 1]`,
//!   `y` grows downward, `z` is relative depth).
//! * [`CameraMapping`] — raw detector coordinates → scene coordinates
//!   (mirroring so the screen behaves like a mirror, optional edge margin).
//! * [`Viewport`] — scene coordinates ↔ pixels, with the cursor clamp used by
//!   the presentation layer.
//!
//! ## Landmark layout
//!
//! ```text
//!            8   12  16  20        tips
//!            7   11  15  19
//!            6   10  14  18
//!    4       5 ─ 9 ─ 13 ─ 17       knuckles (MCP)
//!     3     /
//!      2   /
//!       1 /
//!        0                         wrist
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

/// Number of points in one hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// (knuckle, tip) pairs for the four non-thumb fingers, index first.
pub const FINGER_KNUCKLE_TIP: [(usize, usize); 4] = [
    (INDEX_MCP,  INDEX_TIP),
    (MIDDLE_MCP, MIDDLE_TIP),
    (RING_MCP,   RING_TIP),
    (PINKY_MCP,  PINKY_TIP),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One skeleton point in normalized image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// The image-plane part of the point.
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance in all three axes.
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// A complete 21-point hand skeleton.
///
/// The default value has every point at the origin; it carries no pose
/// information and never satisfies [`HandLandmarks::four_fingers_curled`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    /// Build from a detector slice.  Returns `None` when the slice is too
    /// short to contain the full skeleton; extra points are ignored.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let head = points.get(..LANDMARK_COUNT)?;
        let mut out = [Landmark::default(); LANDMARK_COUNT];
        out.copy_from_slice(head);
        Some(HandLandmarks { points: out })
    }

    /// Replace one point (builder style).
    pub fn with(mut self, index: usize, landmark: Landmark) -> Self {
        if let Some(p) = self.points.get_mut(index) {
            *p = landmark;
        }
        self
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// The point the cursor follows: the index-finger knuckle.  It stays put
    /// while the finger itself curls, so clicking does not drag the cursor.
    pub fn anchor(&self) -> Vec2 {
        self.points[INDEX_MCP].xy()
    }

    /// Wrist-to-index-knuckle distance; a proxy for how close the hand is
    /// to the camera.
    pub fn thickness(&self) -> f32 {
        self.points[WRIST].distance(&self.points[INDEX_MCP])
    }

    /// Geometric "fist" test used when the recognizer's label is unreliable.
    ///
    /// True when every non-thumb fingertip sits below its knuckle in image
    /// space and the index tip has dropped below the pinky knuckle.
    pub fn four_fingers_curled(&self) -> bool {
        let p = &self.points;
        let all_below = FINGER_KNUCKLE_TIP
            .iter()
            .all(|&(mcp, tip)| p[mcp].y < p[tip].y);
        all_below && p[INDEX_TIP].y > p[PINKY_MCP].y
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CameraMapping — detector space → scene space
// ════════════════════════════════════════════════════════════════════════════

/// Maps raw detector coordinates into the `[0, 1]²` scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraMapping {
    /// Flip horizontally so moving the hand right moves the cursor right.
    pub mirror_x: bool,
    /// Fraction of the frame ignored on every edge; `[margin, 1 - margin]`
    /// is stretched to fill the scene so the cursor can reach the borders
    /// without the hand leaving the camera's view.
    pub margin: f32,
}

impl Default for CameraMapping {
    fn default() -> Self {
        CameraMapping { mirror_x: true, margin: 0.0 }
    }
}

impl CameraMapping {
    pub fn to_scene(&self, raw: Vec2) -> Vec2 {
        let x = if self.mirror_x { 1.0 - raw.x } else { raw.x };
        Vec2::new(self.stretch(x), self.stretch(raw.y))
    }

    fn stretch(&self, v: f32) -> f32 {
        let span = 1.0 - 2.0 * self.margin;
        if span <= f32::EPSILON {
            return 0.5;
        }
        ((v - self.margin) / span).clamp(0.0, 1.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Viewport — scene space ↔ pixels
// ════════════════════════════════════════════════════════════════════════════

/// Size of the drawing surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width:  f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    /// Scene → pixels.  Each axis is capped at `viewport + cursor_size` so a
    /// cursor can slide partly past the edge but never fully off-screen.
    pub fn to_pixels(&self, scene: Vec2, cursor_size: Vec2) -> Vec2 {
        Vec2::new(
            (self.width * scene.x).min(self.width + cursor_size.x),
            (self.height * scene.y).min(self.height + cursor_size.y),
        )
    }

    /// Pixels → scene.  Used by pointer input, which reports raw pixels.
    pub fn to_scene(&self, pixels: Vec2) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(pixels.x / self.width, pixels.y / self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn fist() -> HandLandmarks {
        // Knuckles in a row at y = 0.5, tips folded down to y = 0.6.
        let mut hand = HandLandmarks::default().with(WRIST, Landmark::new(0.5, 0.8, 0.0));
        for (i, &(mcp, tip)) in FINGER_KNUCKLE_TIP.iter().enumerate() {
            let x = 0.4 + 0.05 * i as f32;
            hand = hand
                .with(mcp, Landmark::new(x, 0.5, 0.0))
                .with(tip, Landmark::new(x, 0.6, 0.0));
        }
        hand
    }

    #[test]
    fn from_slice_rejects_short_input() {
        assert!(HandLandmarks::from_slice(&[Landmark::default(); 20]).is_none());
        assert!(HandLandmarks::from_slice(&[Landmark::default(); 21]).is_some());
    }

    #[test]
    fn from_slice_ignores_extra_points() {
        let mut pts = vec![Landmark::default(); 23];
        pts[INDEX_MCP] = Landmark::new(0.3, 0.4, 0.0);
        let hand = HandLandmarks::from_slice(&pts).unwrap();
        assert_eq!(hand.anchor(), Vec2::new(0.3, 0.4));
    }

    #[test]
    fn thickness_is_wrist_to_index_knuckle() {
        let hand = HandLandmarks::default()
            .with(WRIST, Landmark::new(0.0, 0.0, 0.0))
            .with(INDEX_MCP, Landmark::new(0.3, 0.4, 0.0));
        assert!((hand.thickness() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn curled_fingers_detected() {
        assert!(fist().four_fingers_curled());
    }

    #[test]
    fn extended_index_is_not_curled() {
        let hand = fist().with(INDEX_TIP, Landmark::new(0.4, 0.2, 0.0));
        assert!(!hand.four_fingers_curled());
    }

    #[test]
    fn index_tip_must_drop_below_pinky_knuckle() {
        let hand = fist()
            .with(PINKY_MCP, Landmark::new(0.55, 0.7, 0.0))
            .with(PINKY_TIP, Landmark::new(0.55, 0.75, 0.0));
        assert!(!hand.four_fingers_curled());
    }

    #[test]
    fn default_skeleton_is_not_curled() {
        assert!(!HandLandmarks::default().four_fingers_curled());
    }

    #[test]
    fn mirroring_flips_x_only() {
        let m = CameraMapping::default();
        let s = m.to_scene(Vec2::new(0.25, 0.3));
        assert_eq!(s, Vec2::new(0.75, 0.3));
    }

    #[test]
    fn margin_stretches_and_clamps() {
        let m = CameraMapping { mirror_x: false, margin: 0.1 };
        let s = m.to_scene(Vec2::new(0.5, 0.05));
        assert!((s.x - 0.5).abs() < 1e-6);
        assert_eq!(s.y, 0.0);
        assert_eq!(m.to_scene(Vec2::new(0.95, 0.9)).x, 1.0);
    }

    #[test]
    fn pixels_are_capped_past_the_edge() {
        let vp = Viewport::new(800.0, 600.0);
        let px = vp.to_pixels(Vec2::new(2.0, 0.5), Vec2::new(32.0, 32.0));
        assert_eq!(px, Vec2::new(832.0, 300.0));
    }

    #[test]
    fn pixels_round_trip_through_scene() {
        let vp = Viewport::new(1000.0, 500.0);
        assert_eq!(vp.to_scene(Vec2::new(250.0, 250.0)), Vec2::new(0.25, 0.5));
        assert_eq!(Viewport::new(0.0, 0.0).to_scene(Vec2::ONE), Vec2::ZERO);
    }
}
