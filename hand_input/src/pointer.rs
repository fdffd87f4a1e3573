//! Pointer fallback for machines without a camera.
//!
//! Mouse or touch input arrives in pixels and is mapped onto the same
//! `move` / `click` contract as tracked hands, always as hand 0.

use glam::Vec2;
use hand_events::{ClickEvent, Event, MoveEvent};
use hand_geometry::Viewport;
use hand_tracker::{GestureLabel, HandId};

/// Synthetic id used for pointer-driven events.
pub const POINTER_HAND: HandId = HandId(0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Move { x: f32, y: f32 },
    Down { x: f32, y: f32 },
    Up,
}

#[derive(Debug, Clone)]
pub struct PointerInput {
    viewport: Viewport,
    engaged:  bool,
    last:     Vec2,
}

impl PointerInput {
    pub fn new(viewport: Viewport) -> Self {
        PointerInput { viewport, engaged: false, last: Vec2::splat(0.5) }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Last pointer position in scene space.
    pub fn position(&self) -> Vec2 {
        self.last
    }

    pub fn reset(&mut self) {
        self.engaged = false;
    }

    /// Translate one pointer event.  Releases produce nothing.
    pub fn handle(&mut self, event: PointerEvent) -> Option<Event> {
        match event {
            PointerEvent::Move { x, y } => {
                let p = self.to_scene(x, y);
                let gesture = if self.engaged { GestureLabel::PointingUp } else { GestureLabel::OpenPalm };
                Some(Event::Move(MoveEvent {
                    x: p.x,
                    y: p.y,
                    id: POINTER_HAND,
                    gesture,
                    thickness: 1.0,
                }))
            }
            PointerEvent::Down { x, y } => {
                let p = self.to_scene(x, y);
                self.engaged = true;
                Some(Event::Click(ClickEvent { x: p.x, y: p.y }))
            }
            PointerEvent::Up => {
                self.engaged = false;
                None
            }
        }
    }

    fn to_scene(&mut self, x: f32, y: f32) -> Vec2 {
        self.last = self.viewport.to_scene(Vec2::new(x, y)).clamp(Vec2::ZERO, Vec2::ONE);
        self.last
    }
}
