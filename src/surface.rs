/// The rendering/input collaborator the game loop talks to.
///
/// All coordinates are world units (`WORLD_WIDTH` × `WORLD_HEIGHT`); an
/// implementation maps them onto whatever it draws on.

use crate::assets::Sprite;
use crate::error::GameError;
use crate::input::InputEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const MAROON: Rgb = Rgb(85, 0, 0);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

pub trait Surface {
    fn draw_filled_rect(&mut self, rect: Rect, color: Rgb, corner_radius: f32);

    /// Blit `image` with its top-left corner at `pos`.
    fn draw_image(&mut self, image: &Sprite, pos: Point);

    /// Draw `text` centred on `center`; `size` is a point size hint.
    fn draw_text(&mut self, text: &str, color: Rgb, center: Point, size: u16);

    /// Drain pending input without blocking.
    fn poll_events(&mut self) -> Result<Vec<InputEvent>, GameError>;

    /// Forget which keys are held.  Called before every round so a key kept
    /// down across a restart shows up as a fresh press.
    fn reset_input(&mut self);

    /// Show everything drawn since the last call.
    fn present(&mut self) -> Result<(), GameError>;

    /// Block until one frame at `fps` has elapsed since the previous tick.
    fn tick(&mut self, fps: u32);
}
