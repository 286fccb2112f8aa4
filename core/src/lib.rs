//! # merge-2048 Core Engine
//!
//! The rule engine of the 4x4 sliding-tile merge puzzle: tile spawning,
//! directional compaction and merging, score accrual, and win / no-moves-left
//! detection. Rendering and input handling live in the collaborator crates
//! (CLI, WebAssembly, Python); they drive an [`Engine`] with a [`Direction`]
//! and read back a [`Snapshot`].
//!
//! The only randomness is tile spawning, which draws from an injectable
//! `rand::Rng` so games can be replayed from a seed.
//!
//! ## Example
//!
//! ```rust
//! use merge_2048_core::{Direction, Engine, GameStatus};
//!
//! let mut game = Engine::new(42); // Create game with seed 42
//! let outcome = game.step(Direction::Left);
//! println!("Score: {}, Moved: {}", game.score(), outcome.moved);
//! assert_eq!(game.status(), GameStatus::InProgress);
//! ```

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod grid;
pub mod status;

pub use config::{EngineConfig, WinRearm};
pub use direction::Direction;
pub use engine::{Engine, Spawn};
pub use error::{ConfigError, DirectionError, GridError};
pub use grid::{slide_line, Grid, LineSlide, Shift, MAX_TILE};
pub use status::{GameStatus, MoveOutcome, Snapshot};
