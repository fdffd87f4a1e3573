//! # hand_events
//!
//! Turns the tracker's per-frame output into the three events scenes
//! subscribe to:
//!
//! | Event | Payload | When |
//! |---|---|---|
//! | `move` | [`MoveEvent`] `{x, y, id, gesture, thickness}` | every tracked hand, every cycle (stale hands replay their last state) |
//! | `click` | [`ClickEvent`] `{x, y}` | a click gesture is held and that hand's cooldown has expired |
//! | `frameCount` | — | once per completed cycle |
//!
//! ## Click rules
//!
//! * **Primary** — `Pointing_Up`; cooldown 300 ms.
//! * **Secondary** — `Closed_Fist`, or the four non-thumb fingers curled
//!   (unless the label is a thumb gesture); cooldown 600 ms.
//!
//! Both rules share one last-click timestamp per hand.  The primary rule is
//! checked first, so at most one click is emitted per hand per cycle.
//!
//! Handlers are plain closures run synchronously on the caller's thread; a
//! panicking handler is logged and skipped without affecting the others.

pub mod bus;
pub mod click;
pub mod emitter;
pub mod event;

pub use bus::{EventBus, HandlerId};
pub use click::{ClickConfig, ClickGate, ClickRule};
pub use emitter::{CycleSummary, GestureEmitter};
pub use event::{ClickEvent, Event, EventKind, MoveEvent};
