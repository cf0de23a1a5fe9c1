/// Crossterm implementation of `Surface`.
///
/// Draw calls land in a cell back buffer sized to the terminal; `present`
/// writes the whole buffer in one flush.  World units are scaled onto the
/// cell grid, so the playfield stretches to whatever the terminal offers.

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Stdout, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Attribute, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::assets::Sprite;
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::error::GameError;
use crate::input::{InputEvent, Key};
use crate::surface::{Point, Rect, Rgb, Surface};

// ── Held-key synthesis ────────────────────────────────────────────────────────

/// Terminals without key-release reporting only send presses, and the OS
/// key-repeat shows up as more presses.  A held key is considered released
/// once its repeats stop: the first repeat can take a while to arrive, later
/// ones come quickly.
const FIRST_REPEAT_WINDOW: Duration = Duration::from_millis(300);
const REPEAT_WINDOW: Duration = Duration::from_millis(120);

/// Text at or above this size is drawn bold.
const BOLD_TEXT_SIZE: u16 = 22;

#[derive(Clone, Copy, Debug)]
struct HeldKey {
    last_seen: Instant,
    repeating: bool,
}

/// Turns raw press/repeat/release traffic for the hold-to-move keys into
/// clean `KeyDown`/`KeyUp` pairs.
#[derive(Debug, Default)]
struct KeyTracker {
    held: HashMap<Key, HeldKey>,
    /// The terminal reports real release events.
    release_events: bool,
}

impl KeyTracker {
    fn new(release_events: bool) -> Self {
        Self {
            held: HashMap::new(),
            release_events,
        }
    }

    /// Press or repeat.  Only the first one yields `KeyDown`.
    fn seen(&mut self, key: Key, now: Instant) -> Option<InputEvent> {
        match self.held.get_mut(&key) {
            Some(h) => {
                h.last_seen = now;
                h.repeating = true;
                None
            }
            None => {
                self.held.insert(
                    key,
                    HeldKey {
                        last_seen: now,
                        repeating: false,
                    },
                );
                Some(InputEvent::KeyDown(key))
            }
        }
    }

    fn clear(&mut self) {
        self.held.clear();
    }

    fn released(&mut self, key: Key) -> Option<InputEvent> {
        self.held.remove(&key).map(|_| InputEvent::KeyUp(key))
    }

    /// Synthesize releases for keys that went quiet.
    fn expire(&mut self, now: Instant) -> Vec<InputEvent> {
        if self.release_events {
            return Vec::new();
        }
        let mut gone: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, h)| {
                let window = if h.repeating {
                    REPEAT_WINDOW
                } else {
                    FIRST_REPEAT_WINDOW
                };
                now.saturating_duration_since(h.last_seen) > window
            })
            .map(|(k, _)| *k)
            .collect();
        gone.sort_by_key(|k| *k as u8);
        gone.into_iter()
            .filter_map(|k| self.released(k))
            .collect()
    }
}

enum Mapped {
    Quit,
    Key(Key),
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Mapped> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Mapped::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Mapped::Quit),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Mapped::Key(Key::Left)),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Mapped::Key(Key::Right))
        }
        KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Char(' ') => {
            Some(Mapped::Key(Key::Fire))
        }
        KeyCode::Esc => Some(Mapped::Key(Key::Escape)),
        KeyCode::Enter => Some(Mapped::Key(Key::Enter)),
        _ => None,
    }
}

// ── World → cell scaling ──────────────────────────────────────────────────────

fn to_cell(v: f32, world: f32, cells: u16) -> i32 {
    (v / world * cells as f32).floor() as i32
}

/// Half-open cell span covering `[start, start + len)`, never empty.
fn cell_span(start: f32, len: f32, world: f32, cells: u16) -> (i32, i32) {
    let a = to_cell(start, world, cells);
    let b = to_cell(start + len, world, cells).max(a + 1);
    (a, b)
}

// ── Back buffer ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
    bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgb::WHITE,
            bg: Rgb::BLACK,
            bold: false,
        }
    }
}

#[derive(Debug)]
struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        self.cells
            .get_mut(row as usize * self.cols as usize + col as usize)
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb, corner_radius: f32) {
        let (c0, c1) = cell_span(rect.x, rect.w, WORLD_WIDTH, self.cols);
        let (r0, r1) = cell_span(rect.y, rect.h, WORLD_HEIGHT, self.rows);
        let rounded = corner_radius > 0.0 && c1 - c0 >= 2 && r1 - r0 >= 2;
        for row in r0..r1 {
            for col in c0..c1 {
                let corner = match (row == r0, row == r1 - 1, col == c0, col == c1 - 1) {
                    (true, _, true, _) => Some('▗'),
                    (true, _, _, true) => Some('▖'),
                    (_, true, true, _) => Some('▝'),
                    (_, true, _, true) => Some('▘'),
                    _ => None,
                };
                if let Some(cell) = self.get_mut(col, row) {
                    match corner {
                        Some(glyph) if rounded => {
                            cell.ch = glyph;
                            cell.fg = color;
                        }
                        _ => {
                            cell.ch = ' ';
                            cell.bg = color;
                        }
                    }
                }
            }
        }
    }

    fn blit(&mut self, image: &Sprite, pos: Point) {
        let col0 = to_cell(pos.x, WORLD_WIDTH, self.cols);
        let row0 = to_cell(pos.y, WORLD_HEIGHT, self.rows);
        for (dy, line) in image.rows().iter().enumerate() {
            for (dx, &ch) in line.iter().enumerate() {
                if ch == ' ' {
                    continue;
                }
                if let Some(cell) = self.get_mut(col0 + dx as i32, row0 + dy as i32) {
                    cell.ch = ch;
                    cell.fg = image.tint;
                    cell.bold = false;
                }
            }
        }
    }

    fn text(&mut self, text: &str, color: Rgb, center: Point, size: u16) {
        let len = text.chars().count() as i32;
        let col0 = to_cell(center.x, WORLD_WIDTH, self.cols) - len / 2;
        let row = to_cell(center.y, WORLD_HEIGHT, self.rows);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.get_mut(col0 + i as i32, row) {
                cell.ch = ch;
                cell.fg = color;
                cell.bold = size >= BOLD_TEXT_SIZE;
            }
        }
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

pub struct TerminalSurface {
    out: BufWriter<Stdout>,
    rx: mpsc::Receiver<Event>,
    canvas: Canvas,
    keys: KeyTracker,
    keyboard_enhanced: bool,
    last_tick: Instant,
    restored: bool,
}

impl TerminalSurface {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor.
    pub fn open(title: &str, icon: &Sprite) -> Result<Self, GameError> {
        let mut out = BufWriter::new(stdout());

        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(terminal::SetTitle(format!("{} {}", icon.first_line(), title)))?;

        // Ask for key-release events; terminals without the kitty protocol
        // fall back to KeyTracker expiry.  The query reads stdin, so it has
        // to happen before the reader thread starts.
        let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
            && out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        log::info!("keyboard enhancement: {}", keyboard_enhanced);

        // Dedicated thread for blocking event reads, so the frame loop never
        // waits on the terminal.
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        });

        let (cols, rows) = terminal::size()?;
        log::info!("terminal is {}x{} cells", cols, rows);

        Ok(Self {
            out,
            rx,
            canvas: Canvas::new(cols, rows),
            keys: KeyTracker::new(keyboard_enhanced),
            keyboard_enhanced,
            last_tick: Instant::now(),
            restored: false,
        })
    }

    /// Give the terminal back.  Safe to call more than once.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(style::ResetColor);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }

    fn translate(&mut self, key: KeyEvent, now: Instant, events: &mut Vec<InputEvent>) {
        let Some(mapped) = map_key(key.code, key.modifiers) else {
            return;
        };
        match (mapped, key.kind) {
            (Mapped::Quit, KeyEventKind::Press) => events.push(InputEvent::Quit),
            (Mapped::Quit, _) => {}
            (Mapped::Key(k), kind) if k.direction().is_some() => {
                let ev = match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => self.keys.seen(k, now),
                    KeyEventKind::Release => self.keys.released(k),
                };
                events.extend(ev);
            }
            // Fire/Enter/Escape are edge-triggered: presses only.
            (Mapped::Key(k), KeyEventKind::Press) => events.push(InputEvent::KeyDown(k)),
            (Mapped::Key(_), _) => {}
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.restore();
    }
}

impl Surface for TerminalSurface {
    fn draw_filled_rect(&mut self, rect: Rect, color: Rgb, corner_radius: f32) {
        self.canvas.fill_rect(rect, color, corner_radius);
    }

    fn draw_image(&mut self, image: &Sprite, pos: Point) {
        self.canvas.blit(image, pos);
    }

    fn draw_text(&mut self, text: &str, color: Rgb, center: Point, size: u16) {
        self.canvas.text(text, color, center, size);
    }

    fn poll_events(&mut self) -> Result<Vec<InputEvent>, GameError> {
        let now = Instant::now();
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(Event::Key(key)) => self.translate(key, now, &mut events),
                Ok(Event::Resize(cols, rows)) => {
                    log::debug!("resized to {}x{}", cols, rows);
                    self.canvas = Canvas::new(cols, rows);
                    self.out.queue(terminal::Clear(terminal::ClearType::All))?;
                }
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                // Reader thread is gone: the terminal went away.
                Err(TryRecvError::Disconnected) => {
                    events.push(InputEvent::Quit);
                    break;
                }
            }
        }
        events.extend(self.keys.expire(now));
        Ok(events)
    }

    fn reset_input(&mut self) {
        self.keys.clear();
    }

    fn present(&mut self) -> Result<(), GameError> {
        let mut current: Option<(Rgb, Rgb, bool)> = None;
        for row in 0..self.canvas.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.canvas.cols as usize;
            let end = start + self.canvas.cols as usize;
            for cell in &self.canvas.cells[start..end] {
                let look = (cell.fg, cell.bg, cell.bold);
                if current != Some(look) {
                    self.out.queue(style::SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    self.out.queue(style::SetForegroundColor(color(cell.fg)))?;
                    self.out.queue(style::SetBackgroundColor(color(cell.bg)))?;
                    current = Some(look);
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        self.canvas.clear();
        Ok(())
    }

    fn tick(&mut self, fps: u32) {
        let frame = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        let elapsed = self.last_tick.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
        self.last_tick = Instant::now();
    }
}
