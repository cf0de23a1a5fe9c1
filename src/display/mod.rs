/// Rendering layer — turns a `Session` into surface primitives.
///
/// Each function receives a surface and an immutable view of the session.
/// No game logic is performed here; this module only translates state into
/// draw calls.  `terminal` holds the crossterm surface itself.

pub mod terminal;

pub use terminal::TerminalSurface;

use crate::assets::Assets;
use crate::consts::*;
use crate::entities::{Outcome, ProjectileState, Session};
use crate::surface::{Point, Rect, Rgb, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BLOCK: Rgb = Rgb::WHITE;
const C_BLOCK_LABEL: Rgb = Rgb::BLACK;
const C_HUD: Rgb = Rgb(80, 220, 120);
const C_HINT: Rgb = Rgb(110, 110, 110);
const C_WIN_BG: Rgb = Rgb(69, 217, 153);
const C_LOSE_BG: Rgb = Rgb(237, 29, 32);

const BLOCK_CORNER_RADIUS: f32 = 4.0;

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Draw one complete in-play frame (not presented).
pub fn render_playfield<S: Surface>(surface: &mut S, session: &Session, assets: &Assets) {
    surface.draw_filled_rect(
        Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT),
        Rgb::BLACK,
        0.0,
    );
    surface.draw_image(&assets.background, Point::new(0.0, 0.0));

    draw_block(surface, session);
    surface.draw_image(&assets.ship, Point::new(session.ship.x, session.ship.y));

    if let ProjectileState::InFlight { x, y } = session.projectile.state {
        let half = PROJECTILE_SIZE / 2.0;
        surface.draw_image(&assets.projectile, Point::new(x - half, y - half));
    }

    draw_hud(surface, session);
}

fn draw_block<S: Surface>(surface: &mut S, session: &Session) {
    let b = &session.block;
    let rect = Rect::new(b.x, b.y, BLOCK_SIZE, BLOCK_SIZE);
    surface.draw_filled_rect(rect, C_BLOCK, BLOCK_CORNER_RADIUS);
    surface.draw_text(&b.hit_count.to_string(), C_BLOCK_LABEL, rect.center(), 20);
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<S: Surface>(surface: &mut S, session: &Session) {
    surface.draw_text(
        &format!("Bullets Left = {}", session.ammo),
        C_HUD,
        Point::new(80.0, 30.0),
        20,
    );
    surface.draw_text(
        &format!("Welcome to {}", TITLE),
        C_HUD,
        Point::new(400.0, 30.0),
        20,
    );
    surface.draw_text(
        "← → : Move   B / SPACE : Fire   Q : Quit",
        C_HINT,
        Point::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT - 10.0),
        14,
    );
}

// ── Outcome screens ───────────────────────────────────────────────────────────

/// Full-screen result card.  Draws nothing while the round is still on.
pub fn render_outcome<S: Surface>(surface: &mut S, session: &Session) {
    let (bg, lines): (Rgb, [(String, Rgb, u16); 3]) = match session.outcome {
        Outcome::Playing => return,
        Outcome::Won => (
            C_WIN_BG,
            [
                ("You Won, Congrats".to_string(), Rgb::RED, 20),
                (
                    format!("{} bullets to spare", session.ammo),
                    Rgb::MAROON,
                    20,
                ),
                (
                    "Play again? Press Enter  (Esc to quit)".to_string(),
                    Rgb::MAROON,
                    20,
                ),
            ],
        ),
        Outcome::Lost => (
            C_LOSE_BG,
            [
                ("You lose!".to_string(), Rgb::BLACK, 22),
                (
                    format!("The block still needed {} hits", session.block.hit_count),
                    Rgb::BLACK,
                    22,
                ),
                (
                    "Play again? Press Enter  (Esc to quit)".to_string(),
                    Rgb::BLACK,
                    22,
                ),
            ],
        ),
    };

    surface.draw_filled_rect(Rect::new(0.0, 0.0, WORLD_WIDTH, WORLD_HEIGHT), bg, 0.0);
    for (i, (msg, color, size)) in lines.iter().enumerate() {
        let y = 200.0 + 40.0 * i as f32;
        surface.draw_text(msg, *color, Point::new(WORLD_WIDTH / 2.0, y), *size);
    }
}
