use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use rand::thread_rng;

use hell_space::assets::AssetLoader;
use hell_space::consts::TITLE;
use hell_space::display::TerminalSurface;
use hell_space::settings::SETTINGS_FILE;
use hell_space::{game, GameError, Settings};

// ── Logging ───────────────────────────────────────────────────────────────────

/// Send logs to a file: stdout and stderr belong to the game screen.
/// `RUST_LOG` picks the level, `info` by default.
fn init_logging(settings: &Settings) -> Result<(), GameError> {
    let file = File::create(&settings.log_file)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn run() -> Result<(), GameError> {
    let settings_path = Path::new(SETTINGS_FILE);
    let settings = Settings::load(settings_path)?;
    init_logging(&settings)?;
    if settings_path.exists() {
        log::info!("settings loaded from {}", settings_path.display());
    } else {
        log::info!("no {}, using defaults", settings_path.display());
    }
    log::debug!("{:?}", settings);

    // Everything that can fail on disk fails before the terminal is touched.
    let assets = AssetLoader::new(&settings.assets_dir).load_all()?;

    let mut surface = TerminalSurface::open(TITLE, &assets.icon)?;
    let rounds = game::run(&mut surface, &assets, &settings, &mut thread_rng());
    // Always restore the terminal, error or not
    surface.restore();

    let rounds = rounds?;
    log::info!("bye after {} finished rounds", rounds);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("hell_space: {}", e);
            ExitCode::FAILURE
        }
    }
}
