//! One detection cycle's worth of events.

use std::time::Duration;

use log::debug;

use hand_tracker::FrameUpdate;

use crate::bus::EventBus;
use crate::click::{ClickConfig, ClickGate};
use crate::event::{ClickEvent, Event, MoveEvent};

/// What a cycle emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub fresh_moves: usize,
    pub stale_moves: usize,
    pub clicks:      usize,
}

/// Derives move/click/frameCount events from a [`FrameUpdate`].
#[derive(Debug, Default)]
pub struct GestureEmitter {
    gate: ClickGate,
}

impl GestureEmitter {
    pub fn new(config: ClickConfig) -> Self {
        GestureEmitter { gate: ClickGate::new(config) }
    }

    pub fn gate(&self) -> &ClickGate {
        &self.gate
    }

    /// Forget all click cooldowns (tracking restarted).
    pub fn reset(&mut self) {
        self.gate.reset();
    }

    /// Emit, in order: for each fresh hand its `move` then possibly a
    /// `click`; a `move` for each stale hand; one `frameCount`.
    pub fn emit_frame(&mut self, update: &FrameUpdate, now: Duration, bus: &mut EventBus) -> CycleSummary {
        let mut summary = CycleSummary::default();

        for id in &update.purged {
            self.gate.forget(*id);
        }

        for a in &update.fresh {
            bus.emit(&Event::Move(MoveEvent::from_assignment(a)));
            summary.fresh_moves += 1;

            let obs = &a.observation;
            if let Some(rule) = self.gate.evaluate(a.id, obs.gesture, &obs.landmarks, now) {
                debug!("{} click ({:?}) at ({:.3}, {:.3})", a.id, rule, obs.position.x, obs.position.y);
                bus.emit(&Event::Click(ClickEvent { x: obs.position.x, y: obs.position.y }));
                summary.clicks += 1;
            }
        }

        for stale in &update.stale {
            bus.emit(&Event::Move(MoveEvent::from_stale(stale)));
            summary.stale_moves += 1;
        }

        bus.emit(&Event::FrameCount);
        summary
    }
}
