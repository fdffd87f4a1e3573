//! Smoothed on-screen cursors, one per hand id.
//!
//! Scenes feed `move` positions into [`CursorTable::update_cursor`] and call
//! [`CursorTable::update_frame_count`] once per engine tick.  A cursor that
//! has not moved for more than `max_missing_frames` ticks is dropped; the ids
//! of dropped cursors are returned so the presentation layer can remove its
//! visuals.

use std::collections::BTreeMap;

use glam::Vec2;
use hand_geometry::Viewport;
use hand_tracker::HandId;
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorConfig {
    /// Fraction of the remaining distance covered per update, in (0, 1].
    pub smoothing_factor:   f32,
    pub max_missing_frames: u64,
    /// Rendered cursor size in pixels; bounds how far past the edge it may go.
    pub cursor_size:        Vec2,
    pub viewport:           Viewport,
    /// Added to every pixel position (scene-specific layout shift).
    pub offset:             Vec2,
}

impl Default for CursorConfig {
    fn default() -> Self {
        CursorConfig {
            smoothing_factor:   0.5,
            max_missing_frames: 5,
            cursor_size:        Vec2::new(32.0, 32.0),
            viewport:           Viewport::new(800.0, 600.0),
            offset:             Vec2::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedCursor {
    pub id:              HandId,
    /// Eased scene-space position.
    pub smoothed:        Vec2,
    pub last_seen_frame: u64,
}

impl SmoothedCursor {
    fn seed(id: HandId, raw: Vec2, frame: u64) -> Self {
        SmoothedCursor { id, smoothed: raw, last_seen_frame: frame }
    }

    fn step(&mut self, raw: Vec2, factor: f32) {
        self.smoothed += (raw - self.smoothed) * factor;
    }
}

/// Result of one [`CursorTable::update_cursor`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorUpdate {
    pub id:      HandId,
    /// Where to draw the cursor.
    pub pixel:   Vec2,
    /// First update for this id; the caller should create its visual.
    pub created: bool,
}

#[derive(Debug, Default)]
pub struct CursorTable {
    config:  CursorConfig,
    cursors: BTreeMap<HandId, SmoothedCursor>,
    frame:   u64,
}

impl CursorTable {
    pub fn new(config: CursorConfig) -> Self {
        CursorTable { config, cursors: BTreeMap::new(), frame: 0 }
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.config.offset = offset;
    }

    /// Current engine tick.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn update_cursor(&mut self, x: f32, y: f32, id: HandId) -> CursorUpdate {
        let raw = Vec2::new(x, y);
        let frame = self.frame;
        let mut created = false;
        let cursor = self.cursors.entry(id).or_insert_with(|| {
            created = true;
            SmoothedCursor::seed(id, raw, frame)
        });
        cursor.step(raw, self.config.smoothing_factor);
        cursor.last_seen_frame = frame;

        let pixel = self.config.viewport.to_pixels(cursor.smoothed, self.config.cursor_size)
            + self.config.offset;
        if created {
            debug!("cursor for {} created at {:?}", id, pixel);
        }
        CursorUpdate { id, pixel, created }
    }

    /// Advance one engine tick, then drop every cursor unseen for more than
    /// `max_missing_frames` ticks.  Returns the dropped ids in ascending order.
    pub fn update_frame_count(&mut self) -> Vec<HandId> {
        self.frame += 1;
        let frame = self.frame;
        let limit = self.config.max_missing_frames;

        let expired: Vec<HandId> = self
            .cursors
            .values()
            .filter(|c| frame - c.last_seen_frame > limit)
            .map(|c| c.id)
            .collect();
        for id in &expired {
            self.cursors.remove(id);
            debug!("cursor for {} expired at tick {}", id, frame);
        }
        expired
    }

    pub fn remove_cursor(&mut self, id: HandId) -> bool {
        self.cursors.remove(&id).is_some()
    }

    /// Drop every cursor (scene transition).  The tick counter keeps running.
    pub fn reset_all(&mut self) -> Vec<HandId> {
        let ids = self.cursors.keys().copied().collect();
        self.cursors.clear();
        ids
    }

    pub fn get(&self, id: HandId) -> Option<&SmoothedCursor> {
        self.cursors.get(&id)
    }

    /// Pixel position of a live cursor.
    pub fn pixel(&self, id: HandId) -> Option<Vec2> {
        self.cursors.get(&id).map(|c| {
            self.config.viewport.to_pixels(c.smoothed, self.config.cursor_size) + self.config.offset
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmoothedCursor> {
        self.cursors.values()
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
