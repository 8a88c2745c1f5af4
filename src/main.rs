//! Era Hopper headless driver
//!
//! Plays one level with a scripted autopilot at a fixed 60 frames per
//! second of simulated wall time, then reports how the run ended.
//!
//! ```text
//! era-hopper [--era old|current|future] [--level N] [--seconds S] [--tuning PATH] [--seed N]
//! ```
//!
//! `RUST_LOG=debug` shows every pickup and life lost.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use era_hopper::sim::{Bounds, GameEvent, GameOverCause, GamePhase, GameState, TickInput};
use era_hopper::{
    CatalogError, ConfigError, Era, FactBook, FactLedger, LevelCatalog, Session, Tuning,
};

/// Display refresh the autopilot pretends to run at
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Parser)]
#[command(name = "era-hopper")]
#[command(version, about = "Play one Era Hopper level with a scripted autopilot", long_about = None)]
struct Args {
    /// Era to play (old, current or future)
    #[arg(long, default_value = "old")]
    era: Era,

    /// Level id within the era (defaults to the era's first level)
    #[arg(long)]
    level: Option<u32>,

    /// Simulated seconds to run before giving up
    #[arg(long, default_value = "120", value_parser = parse_seconds)]
    seconds: f32,

    /// JSON tuning file overriding the default physics
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Seed for the fact shown on completion
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn parse_seconds(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(seconds) if seconds > 0.0 => Ok(seconds),
        Ok(_) => Err("must be positive".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Head for the nearest uncollected coin and jump when it sits above
/// the player or the player stalls against a wall
#[derive(Debug, Default)]
struct Autopilot {
    last_x: f32,
    stalled_frames: u32,
}

impl Autopilot {
    fn input(&mut self, state: &GameState) -> TickInput {
        let body = state.player.bounds();
        let center = body.center();

        let target = state
            .coins
            .iter()
            .filter(|c| !state.is_collected(&c.id))
            .map(|c| c.bounds().center())
            .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)));

        let Some(target) = target else {
            return TickInput::default();
        };

        if (state.player.pos.x - self.last_x).abs() < 0.5 {
            self.stalled_frames += 1;
        } else {
            self.stalled_frames = 0;
        }
        self.last_x = state.player.pos.x;

        let dx = target.x - center.x;
        let above = target.y < body.top();
        TickInput {
            left: dx < -2.0,
            right: dx > 2.0,
            jump: state.player.on_ground && (above || self.stalled_frames > 10),
            ..Default::default()
        }
    }
}

fn run(args: Args) -> Result<GamePhase, CliError> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let catalog = LevelCatalog::builtin()?;
    let id = match args.level {
        Some(id) => id,
        None => catalog
            .levels_in(args.era)
            .next()
            .map(|l| l.id)
            .ok_or(CatalogError::UnknownLevel {
                era: args.era,
                id: 1,
            })?,
    };

    let mut session = Session::from_catalog(&catalog, args.era, id, tuning)?;
    let mut ledger = FactLedger::new(FactBook::builtin()?, args.seed);
    let mut autopilot = Autopilot::default();

    let frames = (args.seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        if !session.is_running() {
            break;
        }
        let input = autopilot.input(session.state());
        for event in session.advance(FRAME_DT, &input) {
            match event {
                GameEvent::Jump => log::trace!("Jump"),
                GameEvent::Pickup { coin_id } => log::debug!("Picked up coin `{}`", coin_id),
                GameEvent::Hit => log::debug!("Fell off the level"),
                GameEvent::LevelComplete => log::info!("Level complete"),
                GameEvent::GameOver(cause) => log::info!("Game over: {:?}", cause),
            }
        }
    }
    session.stop();

    let state = session.state();
    let level = session.level();
    let outcome = match state.phase {
        GamePhase::Playing => "still playing (out of frames)",
        GamePhase::LevelComplete => "level complete",
        GamePhase::GameOver(GameOverCause::OutOfLives) => "game over, out of lives",
        GamePhase::GameOver(GameOverCause::OutOfTime) => "game over, out of time",
    };

    println!("Level:   {} ({})", level.route(), level.description);
    println!("Outcome: {outcome}");
    println!("Coins:   {}/{}", state.coins_collected(), level.total_coins);
    println!("Lives:   {}", state.lives);
    println!("Time:    {}s left", state.time_remaining);

    if state.is_level_complete() {
        println!("Fact:    {}", ledger.reveal(level.era, level.id));
        match catalog.next_after(level.era, level.id) {
            Some(next) => println!("Next:    {}", next.route()),
            None => println!("Next:    none, all levels cleared"),
        }
    }

    Ok(state.phase)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    log::info!("Era Hopper starting with seed {}", args.seed);

    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
