/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `Session` (or one of its entities) and returns a brand-new value.  The only
/// side effect anywhere in here is the RNG injected into `init_session`.

use rand::Rng;

use crate::consts::*;
use crate::entities::{Block, Outcome, Projectile, ProjectileState, Session, Ship};
use crate::input::{HeldDirections, InputEvent, Key};
use crate::settings::GameRules;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh block at the top of the field with a random column and hit-count.
pub fn spawn_block(rules: &GameRules, rng: &mut impl Rng) -> Block {
    let rules = rules.clamped();
    Block {
        x: rng.gen_range(0.0..=WORLD_WIDTH - BLOCK_SIZE),
        y: BLOCK_START_Y,
        velocity_x: BLOCK_SPEED_X,
        descent: rules.block_descent,
        hit_count: rng.gen_range(rules.hit_count_min..=rules.hit_count_max),
    }
}

/// Build the state a new round starts from.  Ammo is the block's hit-count
/// plus the configured spare shots.
pub fn init_session(rules: &GameRules, rng: &mut impl Rng) -> Session {
    let block = spawn_block(rules, rng);
    let ammo = block.hit_count + rules.spare_ammo;
    Session {
        ship: Ship {
            x: SHIP_START_X,
            y: SHIP_Y,
            velocity_x: 0.0,
        },
        projectile: Projectile {
            state: ProjectileState::Ready,
            speed: PROJECTILE_SPEED,
        },
        block,
        ammo,
        outcome: Outcome::Playing,
        controls: HeldDirections::default(),
        frame: 0,
    }
}

// ── Kinematics ───────────────────────────────────────────────────────────────

/// Apply the ship's velocity and keep it fully on screen.
pub fn advance_ship(ship: &Ship) -> Ship {
    let x = (ship.x + ship.velocity_x).clamp(0.0, WORLD_WIDTH - SHIP_SIZE);
    Ship { x, ..ship.clone() }
}

/// Move diagonally; bounce off either wall.  Descent is continuous.
pub fn advance_block(block: &Block) -> Block {
    let max_x = WORLD_WIDTH - BLOCK_SIZE;
    let mut x = block.x + block.velocity_x;
    let mut velocity_x = block.velocity_x;
    if x <= 0.0 {
        x = 0.0;
        velocity_x = velocity_x.abs();
    } else if x >= max_x {
        x = max_x;
        velocity_x = -velocity_x.abs();
    }
    Block {
        x,
        y: block.y + block.descent,
        velocity_x,
        ..block.clone()
    }
}

/// Fly upward; a shot that reaches the top is spent and the slot is ready.
pub fn advance_projectile(projectile: &Projectile) -> Projectile {
    let state = match projectile.state {
        ProjectileState::Ready => ProjectileState::Ready,
        ProjectileState::InFlight { x, y } => {
            let y = y - projectile.speed;
            if y <= PROJECTILE_TOP {
                ProjectileState::Ready
            } else {
                ProjectileState::InFlight { x, y }
            }
        }
    };
    Projectile {
        state,
        ..projectile.clone()
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Proximity test between the block's centre and the projectile's centre.
///
/// Not a rectangle overlap: anything closer than `HIT_RADIUS` counts, which
/// gives slightly generous arcade-style hits.  The boundary is exclusive.
/// A projectile that is not in flight never collides.
pub fn is_colliding(block: &Block, projectile: &Projectile) -> bool {
    match projectile.state {
        ProjectileState::Ready => false,
        ProjectileState::InFlight { x, y } => {
            let cx = block.x + BLOCK_SIZE / 2.0;
            let cy = block.y + BLOCK_SIZE / 2.0;
            within_hit_radius(cx, cy, x, y)
        }
    }
}

/// Squared-distance comparison, so no square root is taken.
pub fn within_hit_radius(ax: f32, ay: f32, bx: f32, by: f32) -> bool {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy < HIT_RADIUS * HIT_RADIUS
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Launch the projectile from the ship's nose.  No-op while a shot is already
/// flying, when out of ammo, or once the round is over.
pub fn fire(session: &Session) -> Session {
    if session.outcome.is_terminal() || !session.projectile.is_ready() || session.ammo == 0 {
        return session.clone();
    }
    log::debug!("fire at frame {} ({} left)", session.frame, session.ammo - 1);
    Session {
        projectile: Projectile {
            state: ProjectileState::InFlight {
                x: session.ship.x + SHIP_SIZE / 2.0,
                y: session.ship.y,
            },
            ..session.projectile.clone()
        },
        ammo: session.ammo - 1,
        ..session.clone()
    }
}

/// Fold one input event into the session.  Only velocities, held-key flags
/// and the projectile slot change here; positions move in `tick`.
pub fn apply_input(session: &Session, event: InputEvent) -> Session {
    if session.outcome.is_terminal() {
        return session.clone();
    }
    match event {
        InputEvent::KeyDown(Key::Fire) => fire(session),
        InputEvent::KeyDown(key) | InputEvent::KeyUp(key) => {
            let Some(dir) = key.direction() else {
                // Enter/Escape and fire key-ups mean nothing mid-round.
                return session.clone();
            };
            let mut controls = session.controls;
            if matches!(event, InputEvent::KeyDown(_)) {
                controls.press(dir);
            } else {
                controls.release(dir);
            }
            Session {
                ship: Ship {
                    velocity_x: controls.velocity(SHIP_SPEED),
                    ..session.ship.clone()
                },
                controls,
                ..session.clone()
            }
        }
        // Quit is the loop's business.
        InputEvent::Quit => session.clone(),
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame and settle the outcome.
///
/// Checks run in a fixed order and the first terminal result sticks:
/// hit (with the win/lose decision at hit-count zero), then an empty
/// magazine with nothing in the air, then the block reaching the floor.
pub fn tick(session: &Session) -> Session {
    if session.outcome.is_terminal() {
        return session.clone();
    }

    // ── 1. Move everything ───────────────────────────────────────────────────
    let ship = advance_ship(&session.ship);
    let mut block = advance_block(&session.block);
    let mut projectile = advance_projectile(&session.projectile);
    let mut outcome = Outcome::Playing;

    // ── 2. Projectile ↔ block ────────────────────────────────────────────────
    if is_colliding(&block, &projectile) {
        projectile.state = ProjectileState::Ready;
        block.hit_count = block.hit_count.saturating_sub(1);
        log::debug!("hit at frame {}, {} to go", session.frame + 1, block.hit_count);
        if block.hit_count == 0 {
            outcome = if session.ammo >= 1 {
                Outcome::Won
            } else {
                Outcome::Lost
            };
        }
    }

    // ── 3. Out of ammo with nothing left that could score ────────────────────
    if outcome == Outcome::Playing && session.ammo == 0 && projectile.is_ready() {
        outcome = Outcome::Lost;
    }

    // ── 4. Block reached the player ──────────────────────────────────────────
    if outcome == Outcome::Playing && block.y > FLOOR_Y {
        outcome = Outcome::Lost;
    }

    Session {
        ship,
        projectile,
        block,
        outcome,
        frame: session.frame + 1,
        ..session.clone()
    }
}
