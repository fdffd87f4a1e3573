//! The detection loop and its public boundary.
//!
//! One [`InputManager`] owns every mutable table (tracks, cooldowns,
//! handlers) and runs the cycle `detect → associate → emit` on the calling
//! thread.  Handlers run synchronously inside the cycle, so a slow handler
//! delays the next detection.
//!
//! ```
//! use hand_input::{InputConfig, InputManager, InputMode, ManualClock, NoCapture};
//!
//! let mut input = InputManager::new(NoCapture, ManualClock::new());
//! let mode = input.start_tracking(InputConfig::default()).unwrap();
//! assert_eq!(mode, InputMode::Pointer);
//! ```

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use hand_events::{CycleSummary, Event, EventBus, EventKind, GestureEmitter, HandlerId};
use hand_geometry::Viewport;
use hand_tracker::{GestureLabel, HandTracker, RawObservation};
use log::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::InputConfig;
use crate::detector::Detector;
use crate::error::Result;
use crate::pointer::{PointerEvent, PointerInput};
use crate::ticker::Ticker;

/// Where input comes from for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Camera,
    /// No capture source; mouse/touch drives hand 0.
    Pointer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    Stopped,
    /// The detector failed; nothing was emitted.
    Skipped,
    Completed(CycleSummary),
}

/// Cooperative stop flag that handlers can hold.  Takes effect at the top
/// of the next cycle.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(false);
    }

    pub fn is_running(&self) -> bool {
        self.0.get()
    }
}

pub struct InputManager<D: Detector, C: Clock> {
    detector: D,
    clock:    C,
    config:   InputConfig,
    tracker:  HandTracker,
    emitter:  GestureEmitter,
    bus:      EventBus,
    pointer:  PointerInput,
    ticker:   Ticker,
    mode:     Option<InputMode>,
    running:  StopHandle,
    cycles:   u64,
}

impl<D: Detector, C: Clock> InputManager<D, C> {
    pub fn new(detector: D, clock: C) -> Self {
        let config = InputConfig::default();
        InputManager {
            detector,
            clock,
            tracker: HandTracker::new(config.tracker_config()),
            emitter: GestureEmitter::new(config.click_config()),
            bus: EventBus::new(),
            pointer: PointerInput::new(config.cursor_config().viewport),
            ticker: Ticker::new(config.frame_interval()),
            config,
            mode: None,
            running: StopHandle::default(),
            cycles: 0,
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Validate `config`, pick camera or pointer mode, and reset cooldowns
    /// and the cycle counter.  A no-op while already running.
    pub fn start_tracking(&mut self, config: InputConfig) -> Result<InputMode> {
        if self.running.is_running() {
            if let Some(mode) = self.mode {
                debug!("start_tracking while running ({:?})", mode);
                return Ok(mode);
            }
        }
        config.validate()?;

        self.tracker.reconfigure(config.tracker_config());
        self.emitter = GestureEmitter::new(config.click_config());
        self.ticker = Ticker::new(config.frame_interval());
        self.pointer.reset();
        self.cycles = 0;

        let mode = if self.detector.has_capture_source() {
            InputMode::Camera
        } else {
            info!("no capture source; using pointer input");
            InputMode::Pointer
        };
        self.config = config;
        self.mode = Some(mode);
        self.running.0.set(true);
        info!("tracking started ({:?}, {:?} interval)", mode, self.ticker.interval());
        Ok(mode)
    }

    /// Stop the loop and drop every track.  A no-op when stopped.
    pub fn stop_tracking(&mut self) {
        if !self.running.is_running() {
            return;
        }
        self.running.stop();
        self.tracker.clear();
        self.pointer.reset();
        info!("tracking stopped after {} cycles", self.cycles);
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.running.clone()
    }

    /// Hidden → stop; visible again → restart with the last configuration.
    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            let config = self.config.clone();
            self.start_tracking(config).map(|_| ())
        } else {
            self.stop_tracking();
            Ok(())
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Mode of the current (or last) session.
    pub fn mode(&self) -> Option<InputMode> {
        self.mode
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Completed cycles since the last start.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    // ── subscriptions ─────────────────────────────────────────────────────

    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> HandlerId
    where
        F: FnMut(&Event) + 'static,
    {
        self.bus.on(kind, handler)
    }

    pub fn off(&mut self, id: HandlerId) -> bool {
        self.bus.off(id)
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    // ── loop ──────────────────────────────────────────────────────────────

    /// One detection cycle.  Detector failures, panics included, are logged
    /// and the cycle is skipped without a `frameCount`.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if !self.running.is_running() {
            return CycleOutcome::Stopped;
        }
        let now = self.clock.now();

        let summary = match self.mode {
            Some(InputMode::Camera) => {
                let detector = &mut self.detector;
                let detections = match panic::catch_unwind(AssertUnwindSafe(|| detector.detect(now))) {
                    Ok(Ok(d)) => d,
                    Ok(Err(e)) => {
                        warn!("cycle {} skipped: {}", self.cycles, e);
                        return CycleOutcome::Skipped;
                    }
                    Err(_) => {
                        error!("detector panicked; cycle {} skipped", self.cycles);
                        return CycleOutcome::Skipped;
                    }
                };

                let total = detections.len();
                let observations: Vec<RawObservation> = detections
                    .iter()
                    .filter_map(|d| {
                        RawObservation::from_landmarks(
                            &d.landmarks,
                            GestureLabel::from_detector(&d.category),
                            &self.config.camera,
                        )
                    })
                    .collect();
                if observations.len() < total {
                    debug!("{} detections without a full skeleton", total - observations.len());
                }

                let update = self.tracker.update(observations, now);
                self.emitter.emit_frame(&update, now, &mut self.bus)
            }
            Some(InputMode::Pointer) | None => {
                self.bus.emit(&Event::FrameCount);
                CycleSummary::default()
            }
        };

        self.cycles += 1;
        CycleOutcome::Completed(summary)
    }

    /// Run until stopped, pacing cycles to the target interval.  Returns the
    /// number of completed cycles.
    pub fn run(&mut self) -> u64 {
        let before = self.cycles;
        while self.paced_cycle().is_some() {}
        self.cycles - before
    }

    /// Run at most `n` paced cycles.  Stops early when the loop is stopped.
    pub fn run_cycles(&mut self, n: usize) -> Vec<CycleOutcome> {
        (0..n).map_while(|_| self.paced_cycle()).collect()
    }

    fn paced_cycle(&mut self) -> Option<CycleOutcome> {
        let started = self.clock.now();
        let outcome = self.run_cycle();
        if outcome == CycleOutcome::Stopped {
            return None;
        }
        if self.running.is_running() {
            let elapsed = self.clock.now().saturating_sub(started);
            self.clock.sleep(self.ticker.next_delay(elapsed));
        }
        Some(outcome)
    }

    // ── pointer fallback ──────────────────────────────────────────────────

    /// Feed a pointer event.  Ignored unless running in pointer mode.
    pub fn pointer_event(&mut self, event: PointerEvent) -> bool {
        if !self.running.is_running() || self.mode != Some(InputMode::Pointer) {
            return false;
        }
        if let Some(e) = self.pointer.handle(event) {
            self.bus.emit(&e);
        }
        true
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.pointer_event(PointerEvent::Move { x, y })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.pointer_event(PointerEvent::Down { x, y })
    }

    pub fn pointer_up(&mut self) -> bool {
        self.pointer_event(PointerEvent::Up)
    }

    /// Pixel size of the surface pointer coordinates refer to.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.pointer.set_viewport(viewport);
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Gesture of the oldest tracked hand, or the pointer's implied gesture.
    pub fn current_gesture(&self) -> Option<GestureLabel> {
        match self.mode {
            Some(InputMode::Camera) => self.tracker.current_gesture(),
            Some(InputMode::Pointer) if self.running.is_running() => Some(if self.pointer.is_engaged() {
                GestureLabel::PointingUp
            } else {
                GestureLabel::OpenPalm
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::detector::{Detection, NoCapture, ScriptedDetector};
    use crate::error::{DetectorError, InputError};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::time::Duration;

    fn scripted() -> InputManager<ScriptedDetector, ManualClock> {
        InputManager::new(ScriptedDetector::new(), ManualClock::new())
    }

    fn counter(mgr: &mut InputManager<ScriptedDetector, ManualClock>, kind: EventKind) -> Rc<Cell<usize>> {
        let n = Rc::new(Cell::new(0));
        let c = n.clone();
        mgr.on(kind, move |_| c.set(c.get() + 1));
        n
    }

    #[test]
    fn not_started_means_stopped() {
        let mut m = scripted();
        assert_eq!(m.run_cycle(), CycleOutcome::Stopped);
        assert_eq!(m.run(), 0);
    }

    #[test]
    fn invalid_config_fails_at_start() {
        let mut m = scripted();
        let cfg = InputConfig { association_threshold: -1.0, ..Default::default() };
        assert!(matches!(m.start_tracking(cfg), Err(InputError::InvalidConfig { .. })));
        assert!(!m.is_running());
    }

    #[test]
    fn start_is_idempotent() {
        let mut m = scripted();
        assert_eq!(m.start_tracking(InputConfig::default()).unwrap(), InputMode::Camera);
        m.run_cycle();
        // A second start while running keeps the counter.
        let cfg = InputConfig { max_hands: 1, ..Default::default() };
        m.start_tracking(cfg).unwrap();
        assert_eq!(m.cycles(), 1);
        assert_eq!(m.config().max_hands, 3);
    }

    #[test]
    fn missing_camera_selects_pointer_mode() {
        let mut m = InputManager::new(NoCapture, ManualClock::new());
        assert_eq!(m.start_tracking(InputConfig::default()).unwrap(), InputMode::Pointer);
        let frames = Rc::new(Cell::new(0));
        let f = frames.clone();
        m.on(EventKind::FrameCount, move |_| f.set(f.get() + 1));
        assert_eq!(m.run_cycles(3).len(), 3);
        assert_eq!(frames.get(), 3);
        assert_eq!(m.clock().now(), Duration::from_millis(99));
    }

    #[test]
    fn detector_error_skips_without_frame_count() {
        let mut m = scripted();
        m.detector_mut()
            .push_error(DetectorError::Recognition("timeout".into()))
            .push_frame(vec![]);
        let frames = counter(&mut m, EventKind::FrameCount);
        m.start_tracking(InputConfig::default()).unwrap();

        assert_eq!(m.run_cycle(), CycleOutcome::Skipped);
        assert_eq!(frames.get(), 0);
        assert!(matches!(m.run_cycle(), CycleOutcome::Completed(_)));
        assert_eq!(frames.get(), 1);
        assert!(m.is_running());
    }

    #[test]
    fn incomplete_skeletons_are_dropped() {
        let mut m = scripted();
        let mut partial = Detection::at(Vec2::new(0.5, 0.5), "Open_Palm");
        partial.landmarks.truncate(5);
        m.detector_mut().push_frame(vec![partial, Detection::at(Vec2::new(0.2, 0.2), "Open_Palm")]);
        m.start_tracking(InputConfig::default()).unwrap();

        match m.run_cycle() {
            CycleOutcome::Completed(s) => assert_eq!(s.fresh_moves, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn camera_position_is_mirrored() {
        let mut m = scripted();
        m.detector_mut().push_frame(vec![Detection::at(Vec2::new(0.25, 0.5), "Victory")]);
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        m.bus_mut().on_move(move |e| *s.borrow_mut() = Some((e.x, e.y, e.gesture)));
        m.start_tracking(InputConfig::default()).unwrap();
        m.run_cycle();
        assert_eq!(*seen.borrow(), Some((0.75, 0.5, GestureLabel::Victory)));
        assert_eq!(m.current_gesture(), Some(GestureLabel::Victory));
    }

    #[test]
    fn handler_can_stop_the_loop() {
        let mut m = scripted();
        let stop = m.stop_handle();
        let frames = Rc::new(Cell::new(0));
        let f = frames.clone();
        m.on(EventKind::FrameCount, move |_| {
            f.set(f.get() + 1);
            if f.get() == 4 {
                stop.stop();
            }
        });
        m.start_tracking(InputConfig::default()).unwrap();
        assert_eq!(m.run(), 4);
        assert!(!m.is_running());
    }

    #[test]
    fn restart_resets_cooldowns_and_counter() {
        let mut m = scripted();
        let point = Detection::at(Vec2::new(0.5, 0.5), "Pointing_Up");
        m.detector_mut().push_frame(vec![point.clone()]).push_frame(vec![point]);
        let clicks = counter(&mut m, EventKind::Click);

        m.start_tracking(InputConfig::default()).unwrap();
        m.run_cycle();
        assert_eq!(clicks.get(), 1);

        m.set_visible(false).unwrap();
        assert!(!m.is_running());
        m.set_visible(true).unwrap();
        assert_eq!(m.cycles(), 0);

        // Same instant, but cooldowns were forgotten.
        m.run_cycle();
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn pointer_input_is_ignored_in_camera_mode() {
        let mut m = scripted();
        m.start_tracking(InputConfig::default()).unwrap();
        assert!(!m.pointer_down(10.0, 10.0));
    }
}
