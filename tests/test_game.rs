use std::collections::{HashSet, VecDeque};

use hell_space::assets::{Assets, Sprite};
use hell_space::compute::init_session;
use hell_space::consts::*;
use hell_space::entities::*;
use hell_space::game::*;
use hell_space::input::{InputEvent, Key};
use hell_space::settings::{GameRules, Settings};
use hell_space::surface::{Point, Rect, Rgb, Surface};
use hell_space::GameError;

use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Scripted in-memory surface ────────────────────────────────────────────────

/// Hands out one scripted event batch per poll, then `Quit` forever.
/// Records the text, image positions and rects of every presented frame.
///
/// Direction keys behave like a terminal without release events: a second
/// `KeyDown` for a key already held is swallowed until `KeyUp` or a reset.
struct ScriptedSurface {
    script: VecDeque<Vec<InputEvent>>,
    held: HashSet<Key>,
    pending_text: Vec<String>,
    pending_images: Vec<Point>,
    pending_rects: Vec<Rect>,
    frames: Vec<Vec<String>>,
    frame_images: Vec<Vec<Point>>,
    frame_rects: Vec<Vec<Rect>>,
    rects: u32,
    images: u32,
    ticks: u32,
    resets: u32,
}

impl ScriptedSurface {
    fn new(script: Vec<Vec<InputEvent>>) -> Self {
        Self {
            script: script.into(),
            held: HashSet::new(),
            pending_text: Vec::new(),
            pending_images: Vec::new(),
            pending_rects: Vec::new(),
            frames: Vec::new(),
            frame_images: Vec::new(),
            frame_rects: Vec::new(),
            rects: 0,
            images: 0,
            ticks: 0,
            resets: 0,
        }
    }

    fn held_filter(&mut self, event: InputEvent) -> Option<InputEvent> {
        match event {
            InputEvent::KeyDown(k) if k.direction().is_some() => {
                self.held.insert(k).then_some(event)
            }
            InputEvent::KeyUp(k) => self.held.remove(&k).then_some(event),
            other => Some(other),
        }
    }

    fn frames_containing(&self, needle: &str) -> usize {
        self.frames
            .iter()
            .filter(|f| f.iter().any(|t| t.contains(needle)))
            .count()
    }
}

impl Surface for ScriptedSurface {
    fn draw_filled_rect(&mut self, rect: Rect, _color: Rgb, _corner_radius: f32) {
        self.rects += 1;
        self.pending_rects.push(rect);
    }

    fn draw_image(&mut self, _image: &Sprite, pos: Point) {
        self.images += 1;
        self.pending_images.push(pos);
    }

    fn draw_text(&mut self, text: &str, _color: Rgb, _center: Point, _size: u16) {
        self.pending_text.push(text.to_string());
    }

    fn poll_events(&mut self) -> Result<Vec<InputEvent>, GameError> {
        let batch = self.script.pop_front().unwrap_or_else(|| vec![InputEvent::Quit]);
        Ok(batch.into_iter().filter_map(|e| self.held_filter(e)).collect())
    }

    fn reset_input(&mut self) {
        self.held.clear();
        self.resets += 1;
    }

    fn present(&mut self) -> Result<(), GameError> {
        self.frames.push(std::mem::take(&mut self.pending_text));
        self.frame_images.push(std::mem::take(&mut self.pending_images));
        self.frame_rects.push(std::mem::take(&mut self.pending_rects));
        Ok(())
    }

    fn tick(&mut self, _fps: u32) {
        self.ticks += 1;
    }
}

fn test_assets() -> Assets {
    Assets {
        background: Sprite::parse(". .").unwrap(),
        ship: Sprite::parse("/^\\").unwrap(),
        projectile: Sprite::parse("|").unwrap(),
        icon: Sprite::parse("*").unwrap(),
    }
}

fn idle(frames: usize) -> Vec<Vec<InputEvent>> {
    vec![Vec::new(); frames]
}

fn session_with_block_overhead(ammo: u32, hit_count: u32) -> Session {
    let mut s = init_session(&GameRules::default(), &mut StdRng::seed_from_u64(7));
    s.block = Block {
        x: s.ship.x + SHIP_SIZE / 2.0 - BLOCK_SIZE / 2.0,
        y: 50.0,
        velocity_x: 0.0,
        descent: 0.0,
        hit_count,
    };
    s.ammo = ammo;
    s
}

// ── play_round ────────────────────────────────────────────────────────────────

#[test]
fn quit_on_first_poll_ends_round_without_drawing() {
    let mut surface = ScriptedSurface::new(vec![vec![InputEvent::Quit]]);
    let s = session_with_block_overhead(5, 5);
    let end = play_round(&mut surface, s, &test_assets(), 60).unwrap();
    assert_eq!(end, RoundEnd::Quit);
    assert!(surface.frames.is_empty());
}

#[test]
fn quit_beats_fire_in_the_same_batch() {
    let mut surface = ScriptedSurface::new(vec![vec![
        InputEvent::KeyDown(Key::Fire),
        InputEvent::Quit,
    ]]);
    let s = session_with_block_overhead(5, 5);
    let end = play_round(&mut surface, s, &test_assets(), 60).unwrap();
    assert_eq!(end, RoundEnd::Quit);
}

#[test]
fn final_hit_finishes_round_as_won() {
    let mut script = vec![vec![InputEvent::KeyDown(Key::Fire)]];
    script.extend(idle(50));
    let mut surface = ScriptedSurface::new(script);

    let s = session_with_block_overhead(2, 1);
    let end = play_round(&mut surface, s, &test_assets(), 60).unwrap();

    match end {
        RoundEnd::Finished(s) => {
            assert_eq!(s.outcome, Outcome::Won);
            assert_eq!(s.ammo, 1);
            assert_eq!(s.block.hit_count, 0);
        }
        other => panic!("expected a finished round, got {:?}", other),
    }
    // Every in-play frame was presented and paced; the deciding one was not drawn.
    assert_eq!(surface.ticks as usize, surface.frames.len());
    assert!(surface.frames_containing("Bullets Left = 1") > 0);
}

#[test]
fn playfield_shows_block_label_and_hud() {
    let mut surface = ScriptedSurface::new(idle(1));
    let s = session_with_block_overhead(9, 17);
    let _ = play_round(&mut surface, s, &test_assets(), 60).unwrap();
    let first = &surface.frames[0];
    assert!(first.iter().any(|t| t == "17"));
    assert!(first.iter().any(|t| t == "Bullets Left = 9"));
    // background, ship; no projectile while ready
    assert_eq!(surface.images, 2);
}

// ── outcome screens ───────────────────────────────────────────────────────────

#[test]
fn outcome_choice_rules() {
    assert_eq!(outcome_choice(&[]), None);
    assert_eq!(outcome_choice(&[InputEvent::KeyDown(Key::Left)]), None);
    assert_eq!(outcome_choice(&[InputEvent::KeyUp(Key::Enter)]), None);
    assert_eq!(
        outcome_choice(&[InputEvent::KeyDown(Key::Enter)]),
        Some(Choice::Restart)
    );
    assert_eq!(
        outcome_choice(&[InputEvent::KeyDown(Key::Escape)]),
        Some(Choice::Quit)
    );
    assert_eq!(
        outcome_choice(&[InputEvent::KeyDown(Key::Enter), InputEvent::Quit]),
        Some(Choice::Quit)
    );
}

#[test]
fn outcome_screen_ignores_gameplay_keys() {
    let mut surface = ScriptedSurface::new(vec![
        vec![InputEvent::KeyDown(Key::Left)],
        vec![InputEvent::KeyDown(Key::Fire)],
        vec![InputEvent::KeyDown(Key::Enter)],
    ]);
    let mut s = session_with_block_overhead(1, 0);
    s.outcome = Outcome::Won;

    let choice = outcome_screen(&mut surface, &s, 60).unwrap();
    assert_eq!(choice, Choice::Restart);
    assert_eq!(surface.frames.len(), 2);
    assert_eq!(surface.frames_containing("You Won, Congrats"), 2);
}

#[test]
fn lost_screen_says_so() {
    let mut surface = ScriptedSurface::new(vec![Vec::new(), vec![InputEvent::Quit]]);
    let mut s = session_with_block_overhead(0, 3);
    s.outcome = Outcome::Lost;

    let choice = outcome_screen(&mut surface, &s, 60).unwrap();
    assert_eq!(choice, Choice::Quit);
    assert_eq!(surface.frames_containing("You lose!"), 1);
    assert_eq!(surface.frames_containing("still needed 3 hits"), 1);
}

// ── run ───────────────────────────────────────────────────────────────────────

/// Rules under which the block hits the floor on the fourth frame.
fn fast_floor_settings() -> Settings {
    Settings {
        rules: GameRules {
            hit_count_min: 7,
            hit_count_max: 7,
            spare_ammo: 3,
            block_descent: 100.0,
        },
        ..Settings::default()
    }
}

#[test]
fn run_quits_immediately() {
    let mut surface = ScriptedSurface::new(vec![vec![InputEvent::Quit]]);
    let rounds = run(
        &mut surface,
        &test_assets(),
        &Settings::default(),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(rounds, 0);
}

#[test]
fn restart_starts_a_fresh_session() {
    let script = vec![
        // round 1: hold Right, spend one bullet, then the block lands on tick 4
        vec![InputEvent::KeyDown(Key::Right), InputEvent::KeyDown(Key::Fire)],
        Vec::new(),
        Vec::new(),
        Vec::new(),
        // outcome screen
        vec![InputEvent::KeyDown(Key::Enter)],
        // round 2: hands off the keyboard
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        // outcome screen
        vec![InputEvent::KeyDown(Key::Escape)],
    ];
    let mut surface = ScriptedSurface::new(script);
    let rounds = run(
        &mut surface,
        &test_assets(),
        &fast_floor_settings(),
        &mut StdRng::seed_from_u64(3),
    )
    .unwrap();

    assert_eq!(rounds, 2);
    // 3 drawn frames per round, no outcome-screen frames (decided on first poll)
    assert_eq!(surface.frames.len(), 6);
    assert_eq!(surface.frames_containing("Bullets Left = 9"), 3);
    assert_eq!(surface.frames_containing("Bullets Left = 10"), 3);

    // round 1 really moved and fired
    assert_eq!(surface.frame_images[0][1].x, SHIP_START_X + SHIP_SPEED);
    assert_eq!(surface.frame_images[0].len(), 3);

    // round 2 starts from scratch
    let images = &surface.frame_images[3];
    assert_eq!(images.len(), 2, "only background and ship: projectile is ready");
    assert_eq!(images[1], Point::new(SHIP_START_X, SHIP_Y));
    let block = surface.frame_rects[3][1];
    assert_eq!(block.y, BLOCK_START_Y + 100.0);
    assert!(block.x >= 0.0 && block.x <= WORLD_WIDTH - BLOCK_SIZE);
    assert!(surface.frames[3].iter().any(|t| t == "7"));
}

#[test]
fn direction_held_across_restart_moves_the_new_ship() {
    let script = vec![
        // round 1: Right goes down and is never released
        vec![InputEvent::KeyDown(Key::Right)],
        Vec::new(),
        Vec::new(),
        Vec::new(),
        vec![InputEvent::KeyDown(Key::Enter)],
        // round 2: the key is still down and keeps repeating
        vec![InputEvent::KeyDown(Key::Right)],
        vec![InputEvent::KeyDown(Key::Right)],
        Vec::new(),
        Vec::new(),
        vec![InputEvent::KeyDown(Key::Escape)],
    ];
    let mut surface = ScriptedSurface::new(script);
    let rounds = run(
        &mut surface,
        &test_assets(),
        &fast_floor_settings(),
        &mut StdRng::seed_from_u64(3),
    )
    .unwrap();

    assert_eq!(rounds, 2);
    assert_eq!(surface.resets, 2);
    assert_eq!(surface.frames.len(), 6);
    let round_two: Vec<f32> = surface.frame_images[3..]
        .iter()
        .map(|images| images[1].x)
        .collect();
    assert_eq!(
        round_two,
        vec![
            SHIP_START_X + SHIP_SPEED,
            SHIP_START_X + 2.0 * SHIP_SPEED,
            SHIP_START_X + 3.0 * SHIP_SPEED,
        ]
    );
}
