//! # hand_input
//!
//! Camera hand-gesture input for children's mini-games.
//!
//! [`InputManager`] runs a self-paced detection loop (about 30 Hz): it asks a
//! [`Detector`] for the hands in view, gives each a stable id, and emits
//! `move`, `click` and `frameCount` events to subscribed handlers.  When no
//! capture source exists it switches to pointer input, which drives hand 0
//! through the same events.
//!
//! On the consumer side, a [`SceneManager`] routes events to the active
//! [`Scene`] and owns the [`CursorTable`] of smoothed on-screen cursors.
//!
//! ## Feature flags
//!
//! * (default) — pointer fallback; scripted detectors for tests.
//! * `leap` — LeapMotion hardware as the landmark detector.
//!
//! ## Demo keys
//!
//! | Input | Action |
//! |---|---|
//! | mouse move | aim cursor (hand 0) |
//! | left button | click / mark tile |
//! | `Q` / `Escape` | quit |

pub mod app;
pub mod assets;
pub mod clock;
pub mod config;
pub mod cursor;
pub mod detector;
pub mod error;
#[cfg(feature = "leap")]
pub mod leap;
pub mod manager;
pub mod pointer;
pub mod scene;
pub mod ticker;
pub mod visualizer;

pub use assets::{wait_for, wait_for_default, AssetSource, AssetStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::InputConfig;
pub use cursor::{CursorConfig, CursorTable, CursorUpdate, SmoothedCursor};
pub use detector::{Detection, Detector, NoCapture, ScriptedDetector};
pub use error::{DetectorError, InputError, Result};
#[cfg(feature = "leap")]
pub use leap::LeapDetector;
pub use manager::{CycleOutcome, InputManager, InputMode, StopHandle};
pub use pointer::{PointerEvent, PointerInput, POINTER_HAND};
pub use scene::{Scene, SceneManager};
pub use ticker::Ticker;

pub use hand_events::{ClickEvent, Event, EventKind, HandlerId, MoveEvent};
pub use hand_tracker::{GestureLabel, HandId};
