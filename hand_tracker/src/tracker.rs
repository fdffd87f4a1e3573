//! The identity resolver.
//!
//! Each call to [`HandTracker::update`] is one detection cycle:
//!
//! 1. Observations are taken in detector order (at most `max_hands`).
//! 2. Each claims the nearest unclaimed track closer than
//!    `association_threshold`; ties go to the lowest [`HandId`].
//! 3. Unmatched observations get a fresh id from a counter that never goes
//!    backwards.
//! 4. Tracks nobody claimed are replayed as stale until `stale_timeout`
//!    has passed since their last real observation, then purged.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use glam::Vec2;
use log::{debug, warn};

use crate::gesture::GestureLabel;
use crate::observation::RawObservation;

// ════════════════════════════════════════════════════════════════════════════
// HandId
// ════════════════════════════════════════════════════════════════════════════

/// Stable identity of one physical hand for as long as it stays tracked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandId(pub u32);

impl fmt::Display for HandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hand#{}", self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Maximum scene-space distance between a track and an observation for
    /// them to be considered the same hand.
    pub association_threshold: f32,
    /// How long an unmatched track keeps being replayed.
    pub stale_timeout: Duration,
    /// Observations beyond this count in one frame are ignored.
    pub max_hands: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            association_threshold: 0.15,
            stale_timeout:         Duration::from_millis(250),
            max_hands:             3,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackedHand
// ════════════════════════════════════════════════════════════════════════════

/// A hand with identity, as last observed.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedHand {
    pub id:        HandId,
    pub position:  Vec2,
    pub gesture:   GestureLabel,
    pub thickness: f32,
    /// Clock time of the last real (non-replayed) observation.
    pub last_seen: Duration,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameUpdate — result of one cycle
// ════════════════════════════════════════════════════════════════════════════

/// An observation together with the id it was given.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub id:          HandId,
    pub observation: RawObservation,
    /// True when the id was allocated this frame.
    pub born:        bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameUpdate {
    /// One entry per accepted observation, in detector order.
    pub fresh:  Vec<Assignment>,
    /// Unmatched tracks still inside their grace period, ascending id.
    pub stale:  Vec<TrackedHand>,
    /// Tracks dropped this frame, ascending id.
    pub purged: Vec<HandId>,
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker
// ════════════════════════════════════════════════════════════════════════════

pub struct HandTracker {
    config:  TrackerConfig,
    tracks:  BTreeMap<HandId, TrackedHand>,
    /// `None` once every id has been handed out.
    next_id: Option<u32>,
}

impl HandTracker {
    pub fn new(config: TrackerConfig) -> Self {
        HandTracker { config, tracks: BTreeMap::new(), next_id: Some(0) }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Run one association cycle at clock time `now`.
    pub fn update(&mut self, observations: Vec<RawObservation>, now: Duration) -> FrameUpdate {
        let mut out = FrameUpdate::default();
        let mut claimed: BTreeSet<HandId> = BTreeSet::new();

        if observations.len() > self.config.max_hands {
            debug!(
                "dropping {} observations over max_hands={}",
                observations.len() - self.config.max_hands,
                self.config.max_hands
            );
        }

        for obs in observations.into_iter().take(self.config.max_hands) {
            let (id, born) = match self.nearest_unclaimed(obs.position, &claimed) {
                Some((id, dist)) if dist < self.config.association_threshold => (id, false),
                _ => match self.allocate() {
                    Some(id) => (id, true),
                    None => continue,
                },
            };
            if born {
                debug!("{} born at ({:.3}, {:.3})", id, obs.position.x, obs.position.y);
            }
            claimed.insert(id);
            self.tracks.insert(id, TrackedHand {
                id,
                position:  obs.position,
                gesture:   obs.gesture,
                thickness: obs.thickness,
                last_seen: now,
            });
            out.fresh.push(Assignment { id, observation: obs, born });
        }

        let timeout = self.config.stale_timeout;
        let FrameUpdate { stale, purged, .. } = &mut out;
        self.tracks.retain(|id, track| {
            if claimed.contains(id) {
                return true;
            }
            if now.saturating_sub(track.last_seen) > timeout {
                debug!("{} purged after {:?} unseen", id, now.saturating_sub(track.last_seen));
                purged.push(*id);
                false
            } else {
                stale.push(track.clone());
                true
            }
        });

        out
    }

    /// Closest track not yet claimed this frame.  Iterates in ascending id,
    /// and only a strictly closer track replaces the current best, so equal
    /// distances resolve to the older hand.
    fn nearest_unclaimed(&self, pos: Vec2, claimed: &BTreeSet<HandId>) -> Option<(HandId, f32)> {
        let mut best: Option<(HandId, f32)> = None;
        for track in self.tracks.values() {
            if claimed.contains(&track.id) {
                continue;
            }
            let dist = track.position.distance(pos);
            match best {
                Some((_, best_dist)) if best_dist <= dist => {}
                _ if dist.is_nan() => {}
                _ => best = Some((track.id, dist)),
            }
        }
        best
    }

    /// Next unused id.  After `u32::MAX` has been issued the space is
    /// exhausted and unmatched observations are ignored rather than given a
    /// recycled id.
    fn allocate(&mut self) -> Option<HandId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        if self.next_id.is_none() {
            warn!("hand id space exhausted; new hands will not be tracked");
        }
        Some(HandId(id))
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn get(&self, id: HandId) -> Option<&TrackedHand> {
        self.tracks.get(&id)
    }

    /// All live tracks, ascending id.
    pub fn tracks(&self) -> impl Iterator<Item = &TrackedHand> {
        self.tracks.values()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Gesture of the oldest live hand.
    pub fn current_gesture(&self) -> Option<GestureLabel> {
        self.tracks.values().next().map(|t| t.gesture)
    }

    /// Forget every track.  The id counter keeps running so ids are never
    /// reused within a session.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Swap in new thresholds.  Drops every track; ids keep counting.
    pub fn reconfigure(&mut self, config: TrackerConfig) {
        self.config = config;
        self.clear();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn obs(x: f32, y: f32) -> RawObservation {
        RawObservation::at(Vec2::new(x, y), GestureLabel::OpenPalm)
    }

    fn tracker() -> HandTracker {
        HandTracker::new(TrackerConfig::default())
    }

    #[test]
    fn first_observation_gets_id_zero() {
        let mut t = tracker();
        let f = t.update(vec![obs(0.5, 0.5)], ms(0));
        assert_eq!(f.fresh[0].id, HandId(0));
        assert!(f.fresh[0].born);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn small_motion_keeps_id() {
        let mut t = tracker();
        let a = t.update(vec![obs(0.5, 0.5)], ms(0)).fresh[0].id;
        let f = t.update(vec![obs(0.55, 0.52)], ms(33));
        assert_eq!(f.fresh[0].id, a);
        assert!(!f.fresh[0].born);
    }

    #[test]
    fn jump_beyond_threshold_allocates_new_id() {
        let mut t = tracker();
        t.update(vec![obs(0.1, 0.1)], ms(0));
        let f = t.update(vec![obs(0.9, 0.9)], ms(33));
        assert_eq!(f.fresh[0].id, HandId(1));
        // old hand is now stale, not gone
        assert_eq!(f.stale.len(), 1);
        assert_eq!(f.stale[0].id, HandId(0));
    }

    #[test]
    fn two_hands_keep_their_ids_when_order_flips() {
        let mut t = tracker();
        let f = t.update(vec![obs(0.2, 0.2), obs(0.8, 0.8)], ms(0));
        let (a, b) = (f.fresh[0].id, f.fresh[1].id);
        let f = t.update(vec![obs(0.81, 0.8), obs(0.21, 0.2)], ms(33));
        assert_eq!(f.fresh[0].id, b);
        assert_eq!(f.fresh[1].id, a);
    }

    #[test]
    fn a_claimed_track_cannot_be_reused_in_the_same_frame() {
        let mut t = tracker();
        t.update(vec![obs(0.5, 0.5)], ms(0));
        let f = t.update(vec![obs(0.5, 0.5), obs(0.51, 0.5)], ms(33));
        assert_eq!(f.fresh[0].id, HandId(0));
        assert_eq!(f.fresh[1].id, HandId(1));
    }

    #[test]
    fn equidistant_tracks_resolve_to_lowest_id() {
        let mut t = HandTracker::new(TrackerConfig { association_threshold: 0.3, ..Default::default() });
        t.update(vec![obs(0.25, 0.5), obs(0.75, 0.5)], ms(0));
        let f = t.update(vec![obs(0.5, 0.5)], ms(33));
        assert_eq!(f.fresh[0].id, HandId(0));
    }

    #[test]
    fn distance_equal_to_threshold_does_not_associate() {
        let mut t = HandTracker::new(TrackerConfig { association_threshold: 0.25, ..Default::default() });
        t.update(vec![obs(0.5, 0.5)], ms(0));
        let f = t.update(vec![obs(0.75, 0.5)], ms(33));
        assert!(f.fresh[0].born);
    }

    #[test]
    fn stale_tracks_replay_until_timeout_then_purge() {
        let mut t = tracker();
        t.update(vec![obs(0.5, 0.5)], ms(0));

        let f = t.update(vec![], ms(250));
        assert_eq!(f.stale.len(), 1, "exactly at the timeout the track is still replayed");
        assert!(f.purged.is_empty());

        let f = t.update(vec![], ms(251));
        assert!(f.stale.is_empty());
        assert_eq!(f.purged, vec![HandId(0)]);
        assert!(t.is_empty());
    }

    #[test]
    fn stale_track_keeps_last_known_state() {
        let mut t = tracker();
        let mut o = obs(0.3, 0.4);
        o.gesture = GestureLabel::Victory;
        o.thickness = 0.2;
        t.update(vec![o], ms(0));
        let f = t.update(vec![], ms(100));
        let s = &f.stale[0];
        assert_eq!(s.position, Vec2::new(0.3, 0.4));
        assert_eq!(s.gesture, GestureLabel::Victory);
        assert_eq!(s.thickness, 0.2);
        assert_eq!(s.last_seen, ms(0));
    }

    #[test]
    fn stale_track_can_be_reclaimed_within_grace_period() {
        let mut t = tracker();
        t.update(vec![obs(0.5, 0.5)], ms(0));
        t.update(vec![], ms(100));
        let f = t.update(vec![obs(0.52, 0.5)], ms(200));
        assert_eq!(f.fresh[0].id, HandId(0));
        assert_eq!(t.get(HandId(0)).unwrap().last_seen, ms(200));
    }

    #[test]
    fn observations_over_max_hands_are_ignored() {
        let mut t = HandTracker::new(TrackerConfig { max_hands: 2, ..Default::default() });
        let f = t.update(vec![obs(0.1, 0.1), obs(0.5, 0.5), obs(0.9, 0.9)], ms(0));
        assert_eq!(f.fresh.len(), 2);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut t = tracker();
        t.update(vec![obs(0.5, 0.5)], ms(0));
        t.clear();
        let f = t.update(vec![obs(0.5, 0.5)], ms(33));
        assert_eq!(f.fresh[0].id, HandId(1));
    }

    #[test]
    fn current_gesture_is_oldest_hand() {
        let mut t = tracker();
        assert_eq!(t.current_gesture(), None);
        let mut a = obs(0.1, 0.1);
        a.gesture = GestureLabel::ThumbUp;
        t.update(vec![a, obs(0.9, 0.9)], ms(0));
        assert_eq!(t.current_gesture(), Some(GestureLabel::ThumbUp));
    }

    #[test]
    fn exhausted_id_space_never_wraps() {
        let mut t = tracker();
        t.next_id = Some(u32::MAX - 1);
        let f = t.update(vec![obs(0.1, 0.1), obs(0.9, 0.9)], ms(0));
        let ids: Vec<HandId> = f.fresh.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![HandId(u32::MAX - 1), HandId(u32::MAX)]);

        // With the space used up a new hand is ignored, not given id 0.
        t.clear();
        let f = t.update(vec![obs(0.5, 0.5)], ms(33));
        assert!(f.fresh.is_empty());
        assert!(t.get(HandId(0)).is_none());
        assert!(t.is_empty());
    }
}
