//! # merge-2048 CLI
//!
//! Command-line interface for playing the merge puzzle interactively or
//! running headless simulations with simple policies.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use merge_2048_core::{Direction, Engine, EngineConfig, GameStatus};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(name = "merge-2048")]
#[command(author, version, about = "Play the merge puzzle in the terminal or run simulations")]
struct Args {
    /// Run in interactive mode (default if no other mode specified)
    #[arg(short, long)]
    interactive: bool,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,

    /// Engine rules as TOML (win_tile, win_rearm, four_probability)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tile value that wins the game; overrides the config file
    #[arg(long, value_name = "N")]
    win_tile: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Random legal moves
    Random,
    /// Cycle through moves: Left, Down, Right, Up
    Cycle,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = load_config(&args)?;
    info!("engine config: {:?}", config);

    match args.episodes {
        Some(episodes) if !args.interactive => run_headless(&args, &config, episodes),
        _ => run_interactive(&args, &config),
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_toml(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(win_tile) = args.win_tile {
        config = config.with_win_tile(win_tile);
    }
    config.validate()?;
    Ok(config)
}

// -----------------------------------------------------------------------------
// Interactive mode
// -----------------------------------------------------------------------------

/// Run interactive mode where the user plays with the keyboard.
fn run_interactive(args: &Args, config: &EngineConfig) -> Result<()> {
    let mut game = Engine::with_config(config.clone(), args.seed)?;
    let mut best = 0;
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    // Single-key input until the guard drops, including on early returns.
    let raw_mode = RawModeGuard::enable();
    redraw(&game, best, None)?;

    loop {
        let bytes_read = match stdin.read(&mut buffer).context("reading keyboard input")? {
            0 => break,
            n => n,
        };

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(dir) => {
                let outcome = game.step(dir);
                if outcome.moved {
                    best = best.max(game.score());
                    redraw(&game, best, Some(outcome.score_delta))?;
                }
            }
            InputAction::Continue => {
                if game.continue_playing() {
                    redraw(&game, best, None)?;
                }
            }
            InputAction::Restart => {
                game.reset();
                redraw(&game, best, None)?;
            }
            InputAction::Quit => break,
            InputAction::None => {}
        }
    }

    drop(raw_mode);
    println!("\nGoodbye!");
    Ok(())
}

const CONTROLS: &str = "Controls: WASD or Arrow Keys | C to continue | R to restart | Q to quit";

fn redraw<R: rand::Rng>(game: &Engine<R>, best: u32, gained: Option<u32>) -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H")?; // Clear screen
    writeln!(out, "=== 2048 ===")?;
    writeln!(out, "{}\n", CONTROLS)?;
    writeln!(out, "Best: {}", best)?;
    write!(out, "{}", game)?;

    if let Some(points) = gained.filter(|&p| p > 0) {
        writeln!(out, "  +{} points!", points)?;
    }

    match game.status() {
        GameStatus::Won => {
            writeln!(out, "\n  *** YOU REACHED {} ***", game.config().win_tile)?;
            writeln!(out, "  Score: {}", game.score())?;
            writeln!(out, "\n  Press C to keep playing or R to restart")?;
        }
        GameStatus::Lost => {
            writeln!(out, "\n  *** GAME OVER ***")?;
            writeln!(out, "  Final Score: {}", game.score())?;
            writeln!(out, "  Max Tile: {}", game.max_tile())?;
            writeln!(out, "\n  Press R to restart or Q to quit")?;
        }
        GameStatus::InProgress => {}
    }
    out.flush()?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Continue,
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] => InputAction::Restart,
        [b'c'] | [b'C'] => InputAction::Continue,

        _ => InputAction::None,
    }
}

// -----------------------------------------------------------------------------
// Headless mode
// -----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct EpisodeStats {
    score: u32,
    max_tile: u32,
    steps: u32,
    won: bool,
}

/// Run headless simulation mode.
fn run_headless(args: &Args, config: &EngineConfig, episodes: u32) -> Result<()> {
    anyhow::ensure!(episodes > 0, "--episodes must be at least 1");

    // Separate RNG for move selection so policies don't perturb spawns.
    let mut policy_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1000));
    let mut results = Vec::with_capacity(episodes as usize);

    for episode in 0..episodes {
        let episode_seed = args.seed.wrapping_add(episode as u64);
        let mut game = Engine::with_config(config.clone(), episode_seed)?;
        let stats = play_episode(&mut game, args, &mut policy_rng, episode + 1);

        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}, Won={}",
                episode + 1,
                stats.score,
                stats.max_tile,
                stats.steps,
                stats.won
            );
        }
        results.push(stats);
    }

    print_summary(args, config, &results);
    Ok(())
}

fn play_episode(
    game: &mut Engine,
    args: &Args,
    policy_rng: &mut SmallRng,
    episode: u32,
) -> EpisodeStats {
    let mut stats = EpisodeStats::default();
    let mut cycle = 0;

    while !game.is_lost() && (args.max_steps == 0 || stats.steps < args.max_steps) {
        let legal = game.legal_moves();
        let Some(dir) = (match args.policy {
            Policy::Random => select_random(legal, policy_rng),
            Policy::Cycle => select_cycle(legal, &mut cycle),
        }) else {
            break; // No legal moves
        };

        game.step(dir);
        stats.steps += 1;

        if game.status() == GameStatus::Won {
            debug!("episode {} won at step {}", episode, stats.steps);
            stats.won = true;
            game.continue_playing();
        }

        if args.verbose {
            println!("Episode {} Step {}: {:?}", episode, stats.steps, dir);
            print!("{}", game);
        }
    }

    stats.score = game.score();
    stats.max_tile = game.max_tile();
    stats
}

fn print_summary(args: &Args, config: &EngineConfig, results: &[EpisodeStats]) {
    let episodes = results.len();
    let mut scores: Vec<u32> = results.iter().map(|r| r.score).collect();
    scores.sort_unstable();

    let total: u64 = scores.iter().map(|&s| s as u64).sum();
    let avg_score = total as f64 / episodes as f64;
    let median_score = if episodes % 2 == 0 {
        (scores[episodes / 2 - 1] + scores[episodes / 2]) as f64 / 2.0
    } else {
        scores[episodes / 2] as f64
    };

    let mut tile_counts = BTreeMap::new();
    for r in results {
        *tile_counts.entry(r.max_tile).or_insert(0u32) += 1;
    }
    let max_tile_overall = results.iter().map(|r| r.max_tile).max().unwrap_or(0);
    let wins = results.iter().filter(|r| r.won).count();

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("policy={:?}", args.policy);
    println!("seed={}", args.seed);
    println!("max_steps={}", args.max_steps);
    println!("win_tile={}", config.win_tile);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().unwrap_or(&0));
    println!("max_score={}", scores.last().unwrap_or(&0));
    println!("max_tile_overall={}", max_tile_overall);
    println!("wins={}", wins);

    let distribution: Vec<String> = tile_counts
        .iter()
        .map(|(tile, count)| format!("{}:{}", tile, count))
        .collect();
    println!("tile_distribution={}", distribution.join(","));
}

/// Pick uniformly among legal moves.
fn select_random(legal: [bool; 4], rng: &mut SmallRng) -> Option<Direction> {
    let valid: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| legal[d.index()])
        .collect();
    valid.choose(rng).copied()
}

/// Pick the next legal move in the order Left, Down, Right, Up.
fn select_cycle(legal: [bool; 4], cycle: &mut usize) -> Option<Direction> {
    const ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];

    for _ in 0..4 {
        let dir = ORDER[*cycle % 4];
        *cycle += 1;
        if legal[dir.index()] {
            return Some(dir);
        }
    }
    None
}

// -----------------------------------------------------------------------------
// Platform-specific terminal raw mode handling
// -----------------------------------------------------------------------------

/// Keeps stdin in raw mode (no line buffering, no echo) while alive and
/// restores the original settings on drop.
struct RawModeGuard {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

#[cfg(unix)]
impl RawModeGuard {
    fn enable() -> Self {
        let saved = stdin_termios();
        if let Some(original) = saved {
            let mut raw = original;
            raw.c_lflag &= !(libc::ICANON | libc::ECHO);
            raw.c_cc[libc::VMIN] = 1;
            raw.c_cc[libc::VTIME] = 0;
            set_stdin_termios(&raw);
        }
        Self { saved }
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Some(original) = &self.saved {
            set_stdin_termios(original);
        }
    }
}

/// `None` when stdin is not a terminal.
#[cfg(unix)]
fn stdin_termios() -> Option<libc::termios> {
    use std::os::unix::io::AsRawFd;
    let fd = io::stdin().as_raw_fd();
    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        (libc::tcgetattr(fd, &mut termios) == 0).then_some(termios)
    }
}

#[cfg(unix)]
fn set_stdin_termios(termios: &libc::termios) {
    use std::os::unix::io::AsRawFd;
    unsafe {
        libc::tcsetattr(io::stdin().as_raw_fd(), libc::TCSANOW, termios);
    }
}

// Without raw mode each key needs Enter.
#[cfg(not(unix))]
impl RawModeGuard {
    fn enable() -> Self {
        Self {}
    }
}
