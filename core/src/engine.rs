//! The board engine: grid, score, status latches and the random source.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{EngineConfig, WinRearm};
use crate::direction::Direction;
use crate::error::ConfigError;
use crate::grid::{Grid, SIZE};
use crate::status::{GameStatus, MoveOutcome, Snapshot};

/// A tile placed by [`Engine::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    /// Row-major cell index.
    pub index: usize,
    pub value: u32,
}

/// One game session.
///
/// All randomness (where a tile spawns, and whether it is a 2 or a 4) comes
/// from `rng`. [`Engine::new`] seeds a `SmallRng`; tests and replays can
/// inject any `Rng` through [`Engine::with_rng`].
#[derive(Clone)]
pub struct Engine<R = SmallRng> {
    grid: Grid,
    score: u32,
    won: bool,
    continuing: bool,
    lost: bool,
    config: EngineConfig,
    rng: R,
}

impl Engine<SmallRng> {
    /// Create a game with the canonical rules and the given seed.
    ///
    /// The game starts with two random tiles (90% chance of 2, 10% chance of 4).
    pub fn new(seed: u64) -> Self {
        Self::assemble(EngineConfig::default(), SmallRng::seed_from_u64(seed))
    }

    pub fn with_config(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    /// Reseed the random source, then [`reset`](Engine::reset).
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
        self.reset();
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, rng))
    }

    fn assemble(config: EngineConfig, rng: R) -> Self {
        let mut engine = Engine {
            grid: Grid::EMPTY,
            score: 0,
            won: false,
            continuing: false,
            lost: false,
            config,
            rng,
        };
        engine.reset();
        engine
    }

    /// Replace the grid and score, clearing every status latch.
    ///
    /// The status is not evaluated until the next effective move.
    pub fn with_grid(mut self, grid: Grid, score: u32) -> Self {
        self.grid = grid;
        self.score = score;
        self.won = false;
        self.continuing = false;
        self.lost = false;
        self
    }

    /// Start a new game: empty grid, zero score, cleared latches, two tiles.
    pub fn reset(&mut self) {
        self.grid = Grid::EMPTY;
        self.score = 0;
        self.won = false;
        self.continuing = false;
        self.lost = false;
        self.spawn();
        self.spawn();
        info!("new game: {:?}", self.grid.cells());
    }

    /// Place a 2 or 4 in a random empty cell. No-op on a full grid.
    pub fn spawn(&mut self) -> Option<Spawn> {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let index = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen_bool(1.0 - self.config.four_probability) {
            2
        } else {
            4
        };
        self.grid.set(index, value);
        debug!("spawned {} at cell {}", value, index);
        Some(Spawn { index, value })
    }

    /// Push every tile in `direction`.
    ///
    /// If the grid changes, the merge points are added to the score, one
    /// tile is spawned and the status is re-evaluated. Otherwise nothing is
    /// touched. Moves on a lost game are rejected the same way.
    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        if self.lost {
            debug!("ignoring {} on a lost game", direction);
            return MoveOutcome::default();
        }

        let shift = self.grid.shifted(direction);
        if !shift.changed(&self.grid) {
            return MoveOutcome::default();
        }

        self.grid = shift.grid;
        self.score = self.score.saturating_add(shift.gained);
        debug!(
            "moved {}: {} merge(s), +{} (score {})",
            direction, shift.merges, shift.gained, self.score
        );

        self.spawn();
        self.check_status();

        MoveOutcome {
            moved: true,
            score_delta: shift.gained,
        }
    }

    /// Dismiss a win and keep playing.
    ///
    /// Returns false (and does nothing) unless the status is `Won`. Under
    /// [`WinRearm::Once`] the session is marked as continuing; under
    /// [`WinRearm::AfterContinue`] the win latch is cleared instead, so the
    /// session is back to a plain game in progress. A grid
    /// that was dead at the moment of winning is reported lost here, since
    /// the win check skipped the loss check for that move.
    pub fn continue_playing(&mut self) -> bool {
        if self.status() != GameStatus::Won {
            return false;
        }
        match self.config.win_rearm {
            WinRearm::Once => self.continuing = true,
            WinRearm::AfterContinue => {
                self.won = false;
                self.continuing = false;
            }
        }
        self.check_lost();
        true
    }

    /// Whether a move in `direction` would change the grid.
    pub fn can_move(&self, direction: Direction) -> bool {
        !self.lost && self.grid.shifted(direction).changed(&self.grid)
    }

    /// Legal moves as `[Up, Down, Left, Right]`.
    pub fn legal_moves(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.can_move(d))
    }

    /// Grid as a `[row][col]` array.
    pub fn grid(&self) -> [[u32; SIZE]; SIZE] {
        self.grid.rows()
    }

    /// Grid cells in row-major order.
    pub fn cells(&self) -> &[u32; SIZE * SIZE] {
        self.grid.cells()
    }

    pub fn board(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_tile()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        if self.lost {
            GameStatus::Lost
        } else if self.won && !self.continuing {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    /// Whether the player dismissed a win and kept playing.
    pub fn is_continuing(&self) -> bool {
        self.continuing
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.rows(),
            score: self.score,
            status: self.status(),
            continuing: self.continuing,
            max_tile: self.grid.max_tile(),
        }
    }

    // -------------------------------------------------------------------------
    // Private methods
    // -------------------------------------------------------------------------

    /// Win first; a new win skips the loss check for this call.
    fn check_status(&mut self) {
        if !self.won && self.grid.contains(self.config.win_tile) {
            self.won = true;
            self.continuing = false;
            info!("reached {} with score {}", self.config.win_tile, self.score);
            return;
        }
        self.check_lost();
    }

    fn check_lost(&mut self) {
        if self.grid.is_full() && !self.grid.has_adjacent_pair() {
            self.lost = true;
            info!("no moves left, final score {}", self.score);
        }
    }
}

impl<R> std::fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("score", &self.score)
            .field("won", &self.won)
            .field("continuing", &self.continuing)
            .field("lost", &self.lost)
            .field("grid", &self.grid)
            .finish()
    }
}

impl<R> std::fmt::Display for Engine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        write!(f, "{}", self.grid)
    }
}
