use anyhow::Context;
use clap::Parser;
use mnswpr_core::{
    CellCount, ChangeSet, Coord, Difficulty, GameConfig, PlayEngine, RandomMineGenerator,
};
use rand::{SeedableRng, rngs::SmallRng};
use serde::Serialize;

use autoplay::{AutoPlayer, GameReport, Move};

mod autoplay;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Plays seeded minesweeper games with a simple automatic player",
    long_about = None
)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset: easy, medium, hard or veryhard
    #[arg(short, long, conflicts_with_all = ["size", "mines"])]
    difficulty: Option<Difficulty>,

    /// Board side, for a custom board
    #[arg(long, requires = "mines")]
    size: Option<Coord>,

    /// Mine count, for a custom board
    #[arg(long, requires = "size")]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// How many games to play, with consecutive seeds
    #[arg(short = 'n', long, default_value_t = 1)]
    games: u32,

    /// Print every move and its change set as JSON lines
    #[arg(long)]
    trace: bool,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        match (self.size, self.mines) {
            (Some(size), Some(mines)) => {
                GameConfig::new(size, mines).context("invalid custom board")
            }
            _ => Ok(self.difficulty.unwrap_or(Difficulty::Easy).config()),
        }
    }
}

#[derive(Serialize)]
struct TraceLine<'a> {
    game: u32,
    #[serde(rename = "move")]
    next: Move,
    #[serde(flatten)]
    changes: &'a ChangeSet,
}

/// Seeds the guessing player apart from the mine layout.
const PLAYER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

fn play_game(config: GameConfig, game: u32, seed: u64, trace: bool) -> anyhow::Result<GameReport> {
    let mut engine = PlayEngine::with_generator(config, RandomMineGenerator::seeded(seed))?;
    let mut player = AutoPlayer::new(SmallRng::seed_from_u64(seed ^ PLAYER_SEED_SALT));

    let mut trace_error = None;
    let report = player.play(&mut engine, |next, changes| {
        if !trace || trace_error.is_some() {
            return;
        }
        let line = TraceLine {
            game,
            next,
            changes,
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{json}"),
            Err(err) => trace_error = Some(err),
        }
    });
    if let Some(err) = trace_error {
        return Err(err).context("failed to encode trace line");
    }

    log::debug!("game {} finished in state {:?}", game, engine.state());
    Ok(report)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.game_config()?;
    let base_seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "Playing {} game(s) on {}x{} with {} mines, base seed {}",
        args.games,
        config.size,
        config.size,
        config.mines,
        base_seed
    );

    let mut wins = 0;
    for game in 0..args.games {
        let seed = base_seed.wrapping_add(u64::from(game));
        let report = play_game(config, game, seed, args.trace)?;
        if report.won {
            wins += 1;
        }
        if args.trace {
            let line = serde_json::json!({ "game": game, "seed": seed, "report": report });
            println!("{line}");
        } else {
            println!(
                "game {game}: seed {seed} {} after {} moves ({} guesses, {} cells, {} mines left)",
                if report.won { "won" } else { "lost" },
                report.moves,
                report.guesses,
                report.revealed,
                report.mines_remaining,
            );
        }
    }

    if args.games > 0 {
        let rate = f64::from(wins) * 100.0 / f64::from(args.games);
        log::info!("won {}/{} ({:.1}%)", wins, args.games, rate);
        if !args.trace {
            println!("won {wins}/{} ({rate:.1}%)", args.games);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    log::debug!("args: {:?}", args);

    run(&args)
}
