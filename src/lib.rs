/// Hell Space - a one-block terminal shooter
///
/// - `entities`: pure session data
/// - `compute`: kinematics, collision and the per-frame rules
/// - `game`: the frame loop and the outcome screens
/// - `display`: scene rendering plus the crossterm surface

pub mod assets;
pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod settings;
pub mod surface;

pub use error::GameError;
pub use settings::{GameRules, Settings};

/// World geometry and tuning, in logical units (the surface scales them).
pub mod consts {
    /// Logical playfield size
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 500.0;

    pub const TARGET_FPS: u32 = 60;

    pub const SHIP_SIZE: f32 = 70.0;
    pub const SHIP_START_X: f32 = 350.0;
    pub const SHIP_Y: f32 = 400.0;
    /// Horizontal speed while a direction key is held (units/frame)
    pub const SHIP_SPEED: f32 = 4.0;

    pub const PROJECTILE_SIZE: f32 = 30.0;
    /// Upward speed (units/frame)
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// An in-flight projectile at or above this y is spent
    pub const PROJECTILE_TOP: f32 = 10.0;

    pub const BLOCK_SIZE: f32 = 35.0;
    pub const BLOCK_START_Y: f32 = 50.0;
    pub const BLOCK_SPEED_X: f32 = 2.0;
    /// Block below this y has reached the player
    pub const FLOOR_Y: f32 = 380.0;

    /// Centre-to-centre distance under which a shot counts as a hit (exclusive)
    pub const HIT_RADIUS: f32 = 30.0;

    pub const TITLE: &str = "Hell Space";
}
