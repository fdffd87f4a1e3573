//! # hand_tracker
//!
//! Gives camera-detected hands a stable identity across frames.
//!
//! The landmark detector reports an unordered list of hands every frame with
//! no notion of "the same hand as last time".  [`HandTracker::update`] pairs
//! each new [`RawObservation`] with the nearest unclaimed [`TrackedHand`]
//! from the previous frame, allocates fresh [`HandId`]s for the rest, and
//! keeps unmatched tracks alive for a short grace period so brief detector
//! dropouts do not make cursors blink.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use glam::Vec2;
//! use hand_tracker::{HandTracker, RawObservation, GestureLabel, TrackerConfig};
//!
//! let mut tracker = HandTracker::new(TrackerConfig::default());
//!
//! let f0 = tracker.update(vec![RawObservation::at(Vec2::new(0.2, 0.2), GestureLabel::OpenPalm)],
//!                         Duration::ZERO);
//! let f1 = tracker.update(vec![RawObservation::at(Vec2::new(0.21, 0.2), GestureLabel::OpenPalm)],
//!                         Duration::from_millis(33));
//!
//! assert_eq!(f0.fresh[0].id, f1.fresh[0].id);
//! ```

pub mod gesture;
pub mod observation;
pub mod tracker;

pub use gesture::GestureLabel;
pub use observation::RawObservation;
pub use tracker::{Assignment, FrameUpdate, HandId, HandTracker, TrackedHand, TrackerConfig};
