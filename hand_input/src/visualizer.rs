//! Software-rendered demo window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │   tile   │   tile   │   tile               │
//! │──────────┼──────────┼──────────            │
//! │   tile   │   tile   │   tile      ● cursor │
//! │──────────┼──────────┼──────────            │
//! │   tile   │   tile   │   tile               │
//! ├───────────────────────────────────────────┤
//! │  status bar                                │
//! └───────────────────────────────────────────┘
//! ```

use glam::Vec3;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use hand_tracker::HandId;

use crate::app::{Board, Mark, BOARD_SIZE};
use crate::cursor::CursorTable;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:     usize = 640;
pub const WIN_H:     usize = 520;
pub const STATUS_H:  usize = 40;
pub const BOARD_H:   usize = WIN_H - STATUS_H;
const BG_COLOR:      u32   = 0xFF1A1A2E;
const GRID_COLOR:    u32   = 0xFF0F3460;
const X_COLOR:       u32   = 0xFFE94560;
const O_COLOR:       u32   = 0xFF4FC3F7;
const FLASH_COLOR:   u32   = 0xFFFFD700;
const TEXT_BG:       u32   = 0xFF16213E;
const CURSOR_PALETTE: [u32; 4] = [0xFFFFFFFF, 0xFF9CFF57, 0xFFFF9CEE, 0xFFFFC857];

// ════════════════════════════════════════════════════════════════════════════
// Window input snapshot
// ════════════════════════════════════════════════════════════════════════════

/// What the window saw since the last poll.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowInput {
    pub quit:     bool,
    /// Mouse position in board pixels, if inside the window.
    pub mouse:    Option<(f32, f32)>,
    pub pressed:  bool,
    pub released: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

/// The window's pixel buffer.  Every write is clipped to the window.
pub struct Canvas {
    px: Vec<u32>,
}

impl Canvas {
    pub fn new() -> Self {
        Canvas { px: vec![BG_COLOR; WIN_W * WIN_H] }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.px
    }

    pub fn at(&self, x: usize, y: usize) -> Option<u32> {
        (x < WIN_W && y < WIN_H).then(|| self.px[y * WIN_W + x])
    }

    fn put(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.px[y * WIN_W + x] = color;
        }
    }

    fn clear(&mut self) {
        self.px.fill(BG_COLOR);
    }

    fn fill(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            let start = row * WIN_W;
            self.px[start + x.min(WIN_W)..start + (x + w).min(WIN_W)].fill(color);
        }
    }

    /// One-pixel rectangle outline.
    fn outline(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 {
            return;
        }
        let (right, bottom) = (x + w - 1, y + h - 1);
        for i in x..=right {
            self.put(i, y, color);
            self.put(i, bottom, color);
        }
        for j in y..=bottom {
            self.put(x, j, color);
            self.put(right, j, color);
        }
    }

    /// Ring of thickness 3 centred on `(px, py)`.
    fn ring(&mut self, px: f32, py: f32, size: usize, color: u32) {
        let half = (size / 2) as isize;
        let inner = (half - 3).max(0).pow(2);
        let (cx, cy) = (px as isize, py as isize);
        for dy in -half..=half {
            for dx in -half..=half {
                let d2 = dx * dx + dy * dy;
                let (x, y) = (cx + dx, cy + dy);
                if d2 <= half * half && d2 >= inner && x >= 0 && y >= 0 {
                    self.put(x as usize, y as usize, color);
                }
            }
        }
    }

    /// Text in the 3×5 font, 4 px per character.  Characters without a
    /// glyph leave a gap.
    fn text(&mut self, s: &str, x: usize, y: usize, color: u32) {
        for (i, ch) in s.chars().enumerate() {
            let left = x + 4 * i;
            if left + 3 > WIN_W {
                break;
            }
            let Some(bits) = glyph(ch) else { continue };
            for n in 0..15 {
                if bits & (1 << (14 - n)) != 0 {
                    self.put(left + n % 3, y + n / 3, color);
                }
            }
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new()
    }
}

/// Paint a whole frame.
pub fn paint(canvas: &mut Canvas, board: &Board, cursors: &CursorTable, status: &str) {
    canvas.clear();
    paint_board(canvas, board);

    let size = cursors.config().cursor_size.x as usize;
    for c in cursors.iter() {
        if let Some(p) = cursors.pixel(c.id) {
            canvas.ring(p.x, p.y, size, cursor_color(c.id));
        }
    }

    canvas.fill(0, BOARD_H, WIN_W, STATUS_H, TEXT_BG);
    canvas.text(status, 10, BOARD_H + 8, 0xFFEEEEEE);
    canvas.text(LEGEND, 10, WIN_H - 14, 0xFF888888);
}

fn paint_board(canvas: &mut Canvas, board: &Board) {
    let tw = WIN_W / BOARD_SIZE;
    let th = BOARD_H / BOARD_SIZE;
    let origin = |tile: usize| ((tile % BOARD_SIZE) * tw, (tile / BOARD_SIZE) * th);

    for tile in 0..BOARD_SIZE * BOARD_SIZE {
        let (x, y) = origin(tile);
        let mark_color = match board.mark(tile) {
            Some(Mark::X) => Some(X_COLOR),
            Some(Mark::O) => Some(O_COLOR),
            None => None,
        };
        if let Some(color) = mark_color {
            canvas.fill(x + 8, y + 8, tw - 16, th - 16, color);
        }
        canvas.outline(x, y, tw, th, GRID_COLOR);
    }

    for flash in board.flashes() {
        let (x, y) = origin(flash.tile);
        let color = mix(BG_COLOR, FLASH_COLOR, flash.strength());
        for inset in [2, 3] {
            canvas.outline(x + inset, y + inset, tw - 2 * inset, th - 2 * inset, color);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    canvas:     Canvas,
    mouse_down: bool,
}

impl Visualizer {
    pub fn new() -> Result<Self, String> {
        let mut window = Window::new(
            "Hand Input — pointer or hands",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16)));

        Ok(Visualizer { window, canvas: Canvas::new(), mouse_down: false })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse.  Press/release are edges, not levels.
    pub fn poll_input(&mut self) -> WindowInput {
        let mut input = WindowInput::default();
        if !self.window.is_open()
            || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            input.quit = true;
            return input;
        }

        input.mouse = self.window.get_mouse_pos(MouseMode::Clamp);
        let down = self.window.get_mouse_down(MouseButton::Left);
        input.pressed  = down && !self.mouse_down;
        input.released = !down && self.mouse_down;
        self.mouse_down = down;
        input
    }

    pub fn render(&mut self, board: &Board, cursors: &CursorTable, status: &str) {
        paint(&mut self.canvas, board, cursors, status);
        self.window.update_with_buffer(self.canvas.pixels(), WIN_W, WIN_H).ok();
    }
}

fn cursor_color(id: HandId) -> u32 {
    CURSOR_PALETTE[id.0 as usize % CURSOR_PALETTE.len()]
}

/// Linear mix of two opaque ARGB colors, `t` clamped to [0, 1].
fn mix(a: u32, b: u32, t: f32) -> u32 {
    let rgb = |c: u32| Vec3::new(((c >> 16) & 0xFF) as f32, ((c >> 8) & 0xFF) as f32, (c & 0xFF) as f32);
    let v = rgb(a).lerp(rgb(b), t.clamp(0.0, 1.0)).round();
    0xFF00_0000 | (v.x as u32) << 16 | (v.y as u32) << 8 | v.z as u32
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 font
// ────────────────────────────────────────────────────────────────────────────

const LEGEND: &str = "move=aim  press or point=mark  Q/Esc=quit";

/// Five rows of three bits, one octal digit per row, top row first.  Covers
/// what the status line and legend print: digits, the letters of the mode
/// and gesture names, and `:=/_-`.
const GLYPHS: &[(char, u16)] = &[
    ('0', 0o75557), ('1', 0o26227), ('2', 0o71747), ('3', 0o71717), ('4', 0o55711), ('5', 0o74717),
    ('6', 0o74757), ('7', 0o71111), ('8', 0o75757), ('9', 0o75717), ('A', 0o75755), ('B', 0o65656),
    ('C', 0o74447), ('D', 0o65556), ('E', 0o74747), ('F', 0o74744), ('G', 0o74557), ('H', 0o55755),
    ('I', 0o72227), ('K', 0o55655), ('L', 0o44447), ('M', 0o57555), ('N', 0o75555), ('O', 0o75557),
    ('P', 0o75744), ('Q', 0o75571), ('R', 0o65655), ('S', 0o74717), ('T', 0o72222), ('U', 0o55557),
    ('V', 0o55522), ('W', 0o55575), ('X', 0o55255), ('Y', 0o55722), (':', 0o02020), ('=', 0o07070),
    ('/', 0o11244), ('_', 0o00007), ('-', 0o00700),
];

fn glyph(c: char) -> Option<u16> {
    let c = c.to_ascii_uppercase();
    GLYPHS.iter().find(|&&(g, _)| g == c).map(|&(_, bits)| bits)
}
