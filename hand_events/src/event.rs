//! Event payloads.

use std::fmt;

use hand_tracker::{Assignment, GestureLabel, HandId, TrackedHand};

/// Position update for one hand, in scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveEvent {
    pub x:         f32,
    pub y:         f32,
    pub id:        HandId,
    pub gesture:   GestureLabel,
    pub thickness: f32,
}

impl MoveEvent {
    pub fn from_assignment(a: &Assignment) -> Self {
        MoveEvent {
            x:         a.observation.position.x,
            y:         a.observation.position.y,
            id:        a.id,
            gesture:   a.observation.gesture,
            thickness: a.observation.thickness,
        }
    }

    pub fn from_stale(t: &TrackedHand) -> Self {
        MoveEvent {
            x:         t.position.x,
            y:         t.position.y,
            id:        t.id,
            gesture:   t.gesture,
            thickness: t.thickness,
        }
    }
}

/// A click at a scene position.  Mapping it to whatever sits under that
/// point is up to the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Move(MoveEvent),
    Click(ClickEvent),
    FrameCount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Move,
    Click,
    FrameCount,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Move(_)    => EventKind::Move,
            Event::Click(_)   => EventKind::Click,
            Event::FrameCount => EventKind::FrameCount,
        }
    }
}

impl EventKind {
    /// Name used by scenes and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Move       => "move",
            EventKind::Click      => "click",
            EventKind::FrameCount => "frameCount",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "move"       => Some(EventKind::Move),
            "click"      => Some(EventKind::Click),
            "frameCount" => Some(EventKind::FrameCount),
            _            => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
