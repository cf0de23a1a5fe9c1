/// The frame loop and the outcome screens.
///
/// Each frame: poll input, fold it into the session, tick, then render,
/// present and wait out the frame budget.  A terminal outcome hands control
/// to the outcome screen, which only understands restart and quit.

use rand::Rng;

use crate::assets::Assets;
use crate::compute::{apply_input, init_session, tick};
use crate::display::{render_outcome, render_playfield};
use crate::entities::{Outcome, Session};
use crate::error::GameError;
use crate::input::{InputEvent, Key};
use crate::settings::Settings;
use crate::surface::Surface;

/// How a round of play ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundEnd {
    Quit,
    Finished(Session),
}

/// What the player chose on the outcome screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Restart,
    Quit,
}

/// Play rounds until the player quits.  Returns the number of rounds that
/// reached an outcome.
pub fn run<S: Surface, R: Rng>(
    surface: &mut S,
    assets: &Assets,
    settings: &Settings,
    rng: &mut R,
) -> Result<u32, GameError> {
    let mut finished = 0;
    loop {
        let session = init_session(&settings.rules, rng);
        log::info!(
            "new round: block hit-count {}, ammo {}, block x {:.0}",
            session.block.hit_count,
            session.ammo,
            session.block.x
        );

        surface.reset_input();
        let session = match play_round(surface, session, assets, settings.fps)? {
            RoundEnd::Quit => {
                log::info!("quit during play");
                return Ok(finished);
            }
            RoundEnd::Finished(session) => session,
        };
        finished += 1;
        log::info!(
            "round over after {} frames: {:?} (ammo {}, hit-count {}, block y {:.1})",
            session.frame,
            session.outcome,
            session.ammo,
            session.block.hit_count,
            session.block.y
        );

        match outcome_screen(surface, &session, settings.fps)? {
            Choice::Restart => log::info!("restart"),
            Choice::Quit => {
                log::info!("quit from outcome screen");
                return Ok(finished);
            }
        }
    }
}

/// Run the in-play loop until the round resolves or the player quits.
pub fn play_round<S: Surface>(
    surface: &mut S,
    mut session: Session,
    assets: &Assets,
    fps: u32,
) -> Result<RoundEnd, GameError> {
    loop {
        // ── 1. Input (quit beats everything else in the batch) ───────────────
        let events = surface.poll_events()?;
        if events.contains(&InputEvent::Quit) {
            return Ok(RoundEnd::Quit);
        }
        for event in events {
            session = apply_input(&session, event);
        }

        // ── 2-3. Move, collide, settle ───────────────────────────────────────
        session = tick(&session);

        // ── 4. Hand off once the round is decided ────────────────────────────
        if session.outcome != Outcome::Playing {
            return Ok(RoundEnd::Finished(session));
        }

        // ── 5-7. Draw, present, pace ─────────────────────────────────────────
        render_playfield(surface, &session, assets);
        surface.present()?;
        surface.tick(fps);
    }
}

/// Show the result until the player restarts (Enter) or quits (Escape or
/// quit).  Every other input is ignored.
pub fn outcome_screen<S: Surface>(
    surface: &mut S,
    session: &Session,
    fps: u32,
) -> Result<Choice, GameError> {
    loop {
        let events = surface.poll_events()?;
        if let Some(choice) = outcome_choice(&events) {
            return Ok(choice);
        }
        render_outcome(surface, session);
        surface.present()?;
        surface.tick(fps);
    }
}

/// First decisive input in a batch, with quit taking priority.
pub fn outcome_choice(events: &[InputEvent]) -> Option<Choice> {
    let quits = events
        .iter()
        .any(|e| matches!(e, InputEvent::Quit | InputEvent::KeyDown(Key::Escape)));
    if quits {
        return Some(Choice::Quit);
    }
    events
        .iter()
        .any(|e| *e == InputEvent::KeyDown(Key::Enter))
        .then_some(Choice::Restart)
}
