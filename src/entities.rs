/// All session entity types — pure data, no logic.

use crate::input::HeldDirections;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Playing,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Playing)
    }
}

// ── Player ship ───────────────────────────────────────────────────────────────

/// Top-left corner plus horizontal velocity; the ship never moves vertically.
#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    /// One of `-SHIP_SPEED`, `0.0`, `SHIP_SPEED`.
    pub velocity_x: f32,
}

// ── Projectile ────────────────────────────────────────────────────────────────

/// The single shot.  Its position only exists while it is flying.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileState {
    Ready,
    /// Centre of the projectile.
    InFlight { x: f32, y: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub state: ProjectileState,
    /// Upward speed in units per frame.
    pub speed: f32,
}

impl Projectile {
    pub fn is_ready(&self) -> bool {
        self.state == ProjectileState::Ready
    }
}

// ── Target block ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    /// Sign flips at either wall.
    pub velocity_x: f32,
    /// Continuous descent per frame.
    pub descent: f32,
    /// Hits still needed; the number drawn on the block.
    pub hit_count: u32,
}

// ── Master session state ──────────────────────────────────────────────────────

/// One playthrough, from spawn to a terminal outcome.  Cloneable so the pure
/// update functions can return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub ship: Ship,
    pub projectile: Projectile,
    pub block: Block,
    /// Shots left; never replenished within a session.
    pub ammo: u32,
    pub outcome: Outcome,
    /// Direction keys currently held, resolved into `ship.velocity_x`.
    pub controls: HeldDirections,
    pub frame: u64,
}
