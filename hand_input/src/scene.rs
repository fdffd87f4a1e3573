//! Scene shell: the consumer side of the event contract.
//!
//! A game screen implements [`Scene`]; the [`SceneManager`] owns the cursor
//! table, routes events to whichever scene is active, and clears cursors on
//! every transition.  Nothing flows back into tracking.

use std::cell::RefCell;
use std::rc::Rc;

use hand_events::{ClickEvent, Event, EventBus, EventKind, HandlerId, MoveEvent};
use hand_tracker::HandId;
use log::info;

use crate::cursor::{CursorConfig, CursorTable};
use crate::error::{InputError, Result};

pub trait Scene {
    fn name(&self) -> &str;

    fn enter(&mut self, _cursors: &mut CursorTable) {}

    fn exit(&mut self) {}

    /// Default behaviour feeds the cursor adapter.
    fn on_move(&mut self, event: &MoveEvent, cursors: &mut CursorTable) {
        cursors.update_cursor(event.x, event.y, event.id);
    }

    /// Hit-testing is up to the scene.
    fn on_click(&mut self, _event: &ClickEvent, _cursors: &CursorTable) {}

    /// Called after the cursor sweep with the ids it dropped.
    fn on_frame_count(&mut self, _expired: &[HandId]) {}
}

pub struct SceneManager {
    scenes:  Vec<Box<dyn Scene>>,
    active:  Option<usize>,
    cursors: CursorTable,
}

impl SceneManager {
    pub fn new(cursor_config: CursorConfig) -> Self {
        SceneManager { scenes: Vec::new(), active: None, cursors: CursorTable::new(cursor_config) }
    }

    /// Add a scene; one registered under the same name is replaced.
    pub fn register(&mut self, scene: Box<dyn Scene>) {
        match self.scenes.iter().position(|s| s.name() == scene.name()) {
            Some(i) => self.scenes[i] = scene,
            None    => self.scenes.push(scene),
        }
    }

    pub fn switch(&mut self, name: &str) -> Result<()> {
        let next = self
            .scenes
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| InputError::UnknownScene(name.to_string()))?;

        if let Some(cur) = self.active {
            self.scenes[cur].exit();
        }
        self.cursors.reset_all();
        self.active = Some(next);
        self.scenes[next].enter(&mut self.cursors);
        info!("scene -> {}", name);
        Ok(())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.map(|i| self.scenes[i].name())
    }

    pub fn cursors(&self) -> &CursorTable {
        &self.cursors
    }

    pub fn cursors_mut(&mut self) -> &mut CursorTable {
        &mut self.cursors
    }

    /// Route one event to the active scene.  `frameCount` also sweeps the
    /// cursor table, even with no scene active.
    pub fn dispatch(&mut self, event: &Event) {
        match event {
            Event::FrameCount => {
                let expired = self.cursors.update_frame_count();
                if let Some(i) = self.active {
                    self.scenes[i].on_frame_count(&expired);
                }
            }
            Event::Move(m) => {
                if let Some(i) = self.active {
                    self.scenes[i].on_move(m, &mut self.cursors);
                }
            }
            Event::Click(c) => {
                if let Some(i) = self.active {
                    self.scenes[i].on_click(c, &self.cursors);
                }
            }
        }
    }

    /// Subscribe a shared manager to all three events on `bus`.
    pub fn attach(this: &Rc<RefCell<SceneManager>>, bus: &mut EventBus) -> Vec<HandlerId> {
        [EventKind::Move, EventKind::Click, EventKind::FrameCount]
            .into_iter()
            .map(|kind| {
                let mgr = Rc::clone(this);
                bus.on(kind, move |e| mgr.borrow_mut().dispatch(e))
            })
            .collect()
    }
}
