//! Demo application: a 3×3 marking board driven by hands or the mouse.
//!
//! `AppState` owns the [`InputManager`] and a shared [`SceneManager`] whose
//! only scene marks the tile under each click.  The window loop feeds mouse
//! input in, runs one paced detection cycle per frame, and renders.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec2;
use hand_events::ClickEvent;
use hand_geometry::Viewport;
use hand_tracker::HandId;
use log::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::InputConfig;
use crate::cursor::{CursorConfig, CursorTable};
use crate::detector::Detector;
use crate::error::Result;
use crate::manager::{CycleOutcome, InputManager, InputMode};
use crate::scene::{Scene, SceneManager};
use crate::visualizer::{Visualizer, WindowInput, BOARD_H, WIN_W};

pub const BOARD_SIZE: usize = 3;
const FLASH_FRAMES:   u32   = 12;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

pub struct AppConfig {
    pub input:       InputConfig,
    /// Pixel area that scene space maps onto.
    pub viewport:    Viewport,
    pub cursor_size: Vec2,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            input:       InputConfig::default(),
            viewport:    Viewport::new(WIN_W as f32, BOARD_H as f32),
            cursor_size: Vec2::new(24.0, 24.0),
        }
    }
}

impl AppConfig {
    fn cursor_config(&self) -> CursorConfig {
        CursorConfig {
            viewport:    self.viewport,
            cursor_size: self.cursor_size,
            ..self.input.cursor_config()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Board
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark { X, O }

impl Mark {
    fn other(self) -> Mark {
        match self { Mark::X => Mark::O, Mark::O => Mark::X }
    }
}

/// A click highlight that fades over a few engine ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    pub tile:        usize,
    pub frames_left: u32,
}

impl Flash {
    pub fn strength(&self) -> f32 {
        self.frames_left as f32 / FLASH_FRAMES as f32
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    marks:   [Option<Mark>; BOARD_SIZE * BOARD_SIZE],
    next:    Mark,
    flashes: Vec<Flash>,
}

impl Default for Board {
    fn default() -> Self {
        Board { marks: [None; BOARD_SIZE * BOARD_SIZE], next: Mark::X, flashes: Vec::new() }
    }
}

impl Board {
    /// Tile under a scene-space point.
    pub fn tile_at(x: f32, y: f32) -> Option<usize> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }
        let col = ((x * BOARD_SIZE as f32) as usize).min(BOARD_SIZE - 1);
        let row = ((y * BOARD_SIZE as f32) as usize).min(BOARD_SIZE - 1);
        Some(row * BOARD_SIZE + col)
    }

    /// Mark the tile under `(x, y)` if empty.  Every hit flashes.
    pub fn play(&mut self, x: f32, y: f32) -> Option<Mark> {
        let tile = Self::tile_at(x, y)?;
        self.flashes.push(Flash { tile, frames_left: FLASH_FRAMES });
        if self.marks[tile].is_some() {
            return None;
        }
        let mark = self.next;
        self.marks[tile] = Some(mark);
        self.next = mark.other();
        Some(mark)
    }

    pub fn mark(&self, tile: usize) -> Option<Mark> {
        self.marks.get(tile).copied().flatten()
    }

    pub fn next(&self) -> Mark {
        self.next
    }

    pub fn is_full(&self) -> bool {
        self.marks.iter().all(Option::is_some)
    }

    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    fn age_flashes(&mut self) {
        for f in &mut self.flashes {
            f.frames_left = f.frames_left.saturating_sub(1);
        }
        self.flashes.retain(|f| f.frames_left > 0);
    }

    pub fn clear(&mut self) {
        *self = Board::default();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// BoardScene
// ════════════════════════════════════════════════════════════════════════════

struct BoardScene {
    board: Rc<RefCell<Board>>,
}

impl Scene for BoardScene {
    fn name(&self) -> &str {
        "board"
    }

    fn enter(&mut self, _cursors: &mut CursorTable) {
        self.board.borrow_mut().clear();
    }

    fn on_click(&mut self, event: &ClickEvent, _cursors: &CursorTable) {
        let mut board = self.board.borrow_mut();
        if let Some(mark) = board.play(event.x, event.y) {
            debug!("{:?} at ({:.2}, {:.2})", mark, event.x, event.y);
        }
        if board.is_full() {
            info!("board full, clearing");
            board.clear();
        }
    }

    fn on_frame_count(&mut self, _expired: &[HandId]) {
        self.board.borrow_mut().age_flashes();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState<D: Detector, C: Clock> {
    input:      InputManager<D, C>,
    scenes:     Rc<RefCell<SceneManager>>,
    board:      Rc<RefCell<Board>>,
    /// Last mouse position forwarded; the window reports one every poll.
    last_mouse: Option<(f32, f32)>,
    pub status: String,
}

impl<D: Detector, C: Clock> AppState<D, C> {
    pub fn new(cfg: AppConfig, detector: D, clock: C) -> Result<Self> {
        let board  = Rc::new(RefCell::new(Board::default()));
        let scenes = Rc::new(RefCell::new(SceneManager::new(cfg.cursor_config())));
        scenes.borrow_mut().register(Box::new(BoardScene { board: Rc::clone(&board) }));
        scenes.borrow_mut().switch("board")?;

        let mut input = InputManager::new(detector, clock);
        input.set_viewport(cfg.viewport);
        SceneManager::attach(&scenes, input.bus_mut());
        let mode = input.start_tracking(cfg.input)?;

        Ok(AppState {
            input,
            scenes,
            board,
            last_mouse: None,
            status: format!("Ready  mode: {:?}", mode),
        })
    }

    /// Forward mouse input.  Only has an effect in pointer mode.  A resting
    /// mouse sends no moves, so its cursor can expire.
    pub fn handle_input(&mut self, win: &WindowInput) {
        if let Some((x, y)) = win.mouse {
            if self.last_mouse != Some((x, y)) {
                self.last_mouse = Some((x, y));
                self.input.pointer_move(x, y);
            }
            if win.pressed {
                self.input.pointer_down(x, y);
            }
        }
        if win.released {
            self.input.pointer_up();
        }
    }

    /// One paced detection cycle, then refresh the status line.
    pub fn tick(&mut self) -> Option<CycleOutcome> {
        let outcome = self.input.run_cycles(1).pop();
        let hands = match self.input.mode() {
            Some(InputMode::Camera) => self.input.tracker().len(),
            _ => self.scenes.borrow().cursors().len(),
        };
        let gesture = self
            .input
            .current_gesture()
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string());
        self.status = format!(
            "mode: {:?}  hands: {}  gesture: {}  next: {:?}",
            self.input.mode().unwrap_or(InputMode::Pointer),
            hands,
            gesture,
            self.board.borrow().next(),
        );
        outcome
    }

    pub fn input(&mut self) -> &mut InputManager<D, C> {
        &mut self.input
    }

    pub fn board(&self) -> Ref<'_, Board> {
        self.board.borrow()
    }

    pub fn scenes(&self) -> Ref<'_, SceneManager> {
        self.scenes.borrow()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run — main loop
// ════════════════════════════════════════════════════════════════════════════

pub fn run<D: Detector>(cfg: AppConfig, detector: D) -> std::result::Result<(), String> {
    let mut vis = Visualizer::new()?;
    let mut app = AppState::new(cfg, detector, SystemClock::new()).map_err(|e| e.to_string())?;

    while vis.is_open() {
        let win = vis.poll_input();
        if win.quit { break; }

        app.handle_input(&win);
        if app.tick().is_none() { break; }

        let scenes = app.scenes();
        vis.render(&app.board(), scenes.cursors(), &app.status);
    }

    app.input().stop_tracking();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::detector::{Detection, NoCapture, ScriptedDetector};

    fn pointer_app() -> AppState<NoCapture, ManualClock> {
        AppState::new(AppConfig::default(), NoCapture, ManualClock::new()).unwrap()
    }

    fn press(x: f32, y: f32) -> WindowInput {
        WindowInput { mouse: Some((x, y)), pressed: true, ..Default::default() }
    }

    #[test]
    fn tiles_cover_the_scene() {
        assert_eq!(Board::tile_at(0.0, 0.0), Some(0));
        assert_eq!(Board::tile_at(0.5, 0.5), Some(4));
        assert_eq!(Board::tile_at(1.0, 1.0), Some(8));
        assert_eq!(Board::tile_at(1.2, 0.5), None);
    }

    #[test]
    fn marks_alternate_and_taken_tiles_refuse() {
        let mut b = Board::default();
        assert_eq!(b.play(0.1, 0.1), Some(Mark::X));
        assert_eq!(b.play(0.1, 0.1), None);
        assert_eq!(b.play(0.9, 0.9), Some(Mark::O));
        assert_eq!(b.flashes().len(), 3);
    }

    #[test]
    fn mouse_press_marks_the_tile_under_it() {
        let mut app = pointer_app();
        let (w, h) = (WIN_W as f32, BOARD_H as f32);
        app.handle_input(&press(w * 0.5, h * 0.5));
        assert_eq!(app.board().mark(4), Some(Mark::X));
        assert_eq!(app.scenes().cursors().len(), 1);
    }

    #[test]
    fn idle_pointer_cursor_expires_and_flash_fades() {
        let mut app = pointer_app();
        app.handle_input(&press(10.0, 10.0));
        for _ in 0..FLASH_FRAMES {
            app.tick();
        }
        assert!(app.board().flashes().is_empty());
        assert!(app.scenes().cursors().is_empty());
    }

    #[test]
    fn resting_mouse_stops_refreshing_its_cursor() {
        let mut app = pointer_app();
        let rest = WindowInput { mouse: Some((100.0, 100.0)), ..Default::default() };
        app.handle_input(&rest);
        assert_eq!(app.scenes().cursors().len(), 1);

        // The window keeps reporting the same position every frame.
        for _ in 0..=InputConfig::default().max_missing_frames {
            app.handle_input(&rest);
            app.tick();
        }
        assert!(app.scenes().cursors().is_empty());

        // Moving again brings it back.
        app.handle_input(&WindowInput { mouse: Some((120.0, 100.0)), ..Default::default() });
        assert_eq!(app.scenes().cursors().len(), 1);
    }

    #[test]
    fn pointing_hand_marks_through_the_camera_path() {
        let mut det = ScriptedDetector::new();
        // Raw x 0.8 is mirrored to scene x 0.2.
        det.push_frame(vec![Detection::at(Vec2::new(0.8, 0.1), "Pointing_Up")]);
        let mut app = AppState::new(AppConfig::default(), det, ManualClock::new()).unwrap();
        assert!(matches!(app.tick(), Some(CycleOutcome::Completed(_))));
        assert_eq!(app.board().mark(0), Some(Mark::X));
        assert!(app.status.contains("Camera"));
    }
}
