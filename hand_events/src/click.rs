//! Click debouncing.

use std::collections::HashMap;
use std::time::Duration;

use hand_geometry::HandLandmarks;
use hand_tracker::{GestureLabel, HandId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickConfig {
    pub primary_gesture:    GestureLabel,
    pub primary_cooldown:   Duration,
    pub secondary_gesture:  GestureLabel,
    /// Longer than the primary cooldown so a fist that briefly reads as a
    /// point cannot click twice.
    pub secondary_cooldown: Duration,
}

impl Default for ClickConfig {
    fn default() -> Self {
        ClickConfig {
            primary_gesture:    GestureLabel::PointingUp,
            primary_cooldown:   Duration::from_millis(300),
            secondary_gesture:  GestureLabel::ClosedFist,
            secondary_cooldown: Duration::from_millis(600),
        }
    }
}

/// Which rule produced a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickRule {
    Primary,
    Secondary,
}

/// Per-hand click cooldown state.
#[derive(Debug, Default)]
pub struct ClickGate {
    config:     ClickConfig,
    last_click: HashMap<HandId, Duration>,
}

impl ClickGate {
    pub fn new(config: ClickConfig) -> Self {
        ClickGate { config, last_click: HashMap::new() }
    }

    pub fn config(&self) -> &ClickConfig {
        &self.config
    }

    /// Decide whether hand `id` clicks at `now`; records the click if so.
    ///
    /// The primary rule is tried first.  Both rules read and write the same
    /// timestamp, so a hand clicks at most once per call.
    pub fn evaluate(
        &mut self,
        id:        HandId,
        gesture:   GestureLabel,
        landmarks: &HandLandmarks,
        now:       Duration,
    ) -> Option<ClickRule> {
        let last = self.last_click.get(&id).copied();

        let rule = if gesture == self.config.primary_gesture
            && cooled(last, now, self.config.primary_cooldown)
        {
            ClickRule::Primary
        } else if self.secondary_triggered(gesture, landmarks)
            && cooled(last, now, self.config.secondary_cooldown)
        {
            ClickRule::Secondary
        } else {
            return None;
        };

        self.last_click.insert(id, now);
        Some(rule)
    }

    fn secondary_triggered(&self, gesture: GestureLabel, landmarks: &HandLandmarks) -> bool {
        gesture == self.config.secondary_gesture
            || (landmarks.four_fingers_curled() && !gesture.is_thumb())
    }

    pub fn last_click(&self, id: HandId) -> Option<Duration> {
        self.last_click.get(&id).copied()
    }

    /// Drop state for a hand that is no longer tracked.
    pub fn forget(&mut self, id: HandId) {
        self.last_click.remove(&id);
    }

    pub fn reset(&mut self) {
        self.last_click.clear();
    }
}

/// A hand that has never clicked is always cooled down.
fn cooled(last: Option<Duration>, now: Duration, cooldown: Duration) -> bool {
    match last {
        None    => true,
        Some(t) => now.saturating_sub(t) > cooldown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_geometry::{Landmark, FINGER_KNUCKLE_TIP};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn curled() -> HandLandmarks {
        let mut hand = HandLandmarks::default();
        for (i, &(mcp, tip)) in FINGER_KNUCKLE_TIP.iter().enumerate() {
            let x = 0.4 + 0.05 * i as f32;
            hand = hand
                .with(mcp, Landmark::new(x, 0.5, 0.0))
                .with(tip, Landmark::new(x, 0.6, 0.0));
        }
        hand
    }

    fn flat() -> HandLandmarks {
        HandLandmarks::default()
    }

    #[test]
    fn pointing_clicks_then_respects_cooldown() {
        let mut gate = ClickGate::default();
        let id = HandId(0);
        let p = GestureLabel::PointingUp;
        assert_eq!(gate.evaluate(id, p, &flat(), ms(0)), Some(ClickRule::Primary));
        assert_eq!(gate.evaluate(id, p, &flat(), ms(100)), None);
        assert_eq!(gate.evaluate(id, p, &flat(), ms(300)), None);
        assert_eq!(gate.evaluate(id, p, &flat(), ms(350)), Some(ClickRule::Primary));
    }

    #[test]
    fn fist_uses_longer_cooldown() {
        let mut gate = ClickGate::default();
        let id = HandId(3);
        let f = GestureLabel::ClosedFist;
        assert_eq!(gate.evaluate(id, f, &flat(), ms(0)), Some(ClickRule::Secondary));
        assert_eq!(gate.evaluate(id, f, &flat(), ms(400)), None);
        assert_eq!(gate.evaluate(id, f, &flat(), ms(601)), Some(ClickRule::Secondary));
    }

    #[test]
    fn curled_fingers_click_without_fist_label() {
        let mut gate = ClickGate::default();
        assert_eq!(
            gate.evaluate(HandId(0), GestureLabel::None, &curled(), ms(0)),
            Some(ClickRule::Secondary)
        );
    }

    #[test]
    fn thumb_gestures_suppress_the_curl_heuristic() {
        let mut gate = ClickGate::default();
        assert_eq!(gate.evaluate(HandId(0), GestureLabel::ThumbUp, &curled(), ms(0)), None);
        assert_eq!(gate.evaluate(HandId(0), GestureLabel::ThumbDown, &curled(), ms(0)), None);
    }

    #[test]
    fn open_palm_never_clicks() {
        let mut gate = ClickGate::default();
        for t in (0..2000).step_by(33) {
            assert_eq!(gate.evaluate(HandId(0), GestureLabel::OpenPalm, &flat(), ms(t)), None);
        }
    }

    #[test]
    fn primary_wins_when_both_rules_hold() {
        let mut gate = ClickGate::default();
        // Pointing label with a curled skeleton satisfies both rules.
        assert_eq!(
            gate.evaluate(HandId(0), GestureLabel::PointingUp, &curled(), ms(0)),
            Some(ClickRule::Primary)
        );
        // The shared timestamp blocks the secondary rule in the same instant.
        assert_eq!(gate.evaluate(HandId(0), GestureLabel::ClosedFist, &curled(), ms(0)), None);
    }

    #[test]
    fn secondary_waits_its_own_window_after_a_primary_click() {
        let mut gate = ClickGate::default();
        let id = HandId(0);
        gate.evaluate(id, GestureLabel::PointingUp, &flat(), ms(0));
        assert_eq!(gate.evaluate(id, GestureLabel::ClosedFist, &flat(), ms(400)), None);
        assert_eq!(gate.evaluate(id, GestureLabel::ClosedFist, &flat(), ms(700)), Some(ClickRule::Secondary));
    }

    #[test]
    fn hands_have_independent_cooldowns() {
        let mut gate = ClickGate::default();
        let p = GestureLabel::PointingUp;
        assert!(gate.evaluate(HandId(0), p, &flat(), ms(0)).is_some());
        assert!(gate.evaluate(HandId(1), p, &flat(), ms(10)).is_some());
    }

    #[test]
    fn forget_clears_cooldown() {
        let mut gate = ClickGate::default();
        let p = GestureLabel::PointingUp;
        gate.evaluate(HandId(0), p, &flat(), ms(0));
        gate.forget(HandId(0));
        assert_eq!(gate.last_click(HandId(0)), None);
        assert!(gate.evaluate(HandId(0), p, &flat(), ms(50)).is_some());
    }
}
