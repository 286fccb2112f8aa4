//! # merge-2048 Python Bindings
//!
//! Python bindings to the merge puzzle engine using PyO3. Exposes a `Game`
//! class for scripting, bots and front ends written in Python.

use merge_2048_core::{Direction, Engine, EngineConfig, MoveOutcome, WinRearm};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// Python wrapper for one game session.
///
/// Usage:
///     from merge_2048 import Game
///     game = Game(seed=42)
///     result = game.step(2)  # Left
///     print(result)  # {'grid': [[...]], 'score': 4, 'moved': True, 'score_delta': 4, ...}
#[pyclass]
pub struct Game {
    inner: Engine,
}

#[pymethods]
impl Game {
    /// Create a new game.
    ///
    /// Args:
    ///     seed: 64-bit seed for the spawn RNG
    ///     win_tile: tile value that wins (default 2048)
    ///     rearm_win: let the win fire again after continuing
    #[new]
    #[pyo3(signature = (seed, win_tile = 2048, rearm_win = false))]
    fn new(seed: u64, win_tile: u32, rearm_win: bool) -> PyResult<Self> {
        let config = EngineConfig {
            win_tile,
            win_rearm: if rearm_win {
                WinRearm::AfterContinue
            } else {
                WinRearm::Once
            },
            ..EngineConfig::default()
        };
        let inner =
            Engine::with_config(config, seed).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Game { inner })
    }

    /// Reset the game to its initial state with a new seed.
    fn reset(&mut self, seed: u64) {
        self.inner.reset_with_seed(seed);
    }

    /// Execute a move.
    ///
    /// Args:
    ///     direction: 0=Up, 1=Down, 2=Left, 3=Right
    ///
    /// Returns:
    ///     dict with keys: grid, score, status, continuing, moved, score_delta
    fn step(&mut self, py: Python<'_>, direction: u8) -> PyResult<PyObject> {
        let direction =
            Direction::try_from(direction).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let outcome = self.inner.step(direction);
        self.create_result_dict(py, outcome)
    }

    /// Dismiss the win notification. Returns False if there was none.
    fn continue_playing(&mut self) -> bool {
        self.inner.continue_playing()
    }

    /// The grid as 4 lists of 4 integers.
    fn grid(&self) -> Vec<Vec<u32>> {
        self.inner.grid().iter().map(|row| row.to_vec()).collect()
    }

    fn score(&self) -> u32 {
        self.inner.score()
    }

    /// "in_progress", "won" or "lost".
    fn status(&self) -> &'static str {
        self.inner.status().as_str()
    }

    fn is_continuing(&self) -> bool {
        self.inner.is_continuing()
    }

    fn max_tile(&self) -> u32 {
        self.inner.max_tile()
    }

    /// Legal moves as a list of 4 booleans [Up, Down, Left, Right].
    fn legal_moves(&self) -> Vec<bool> {
        self.inner.legal_moves().to_vec()
    }

    fn __repr__(&self) -> String {
        format!(
            "Game(score={}, max_tile={}, status={})",
            self.inner.score(),
            self.inner.max_tile(),
            self.inner.status()
        )
    }

    fn __str__(&self) -> String {
        format!("{}", self.inner)
    }
}

impl Game {
    fn create_result_dict(&self, py: Python<'_>, outcome: MoveOutcome) -> PyResult<PyObject> {
        let dict = PyDict::new(py);
        dict.set_item("grid", self.grid())?;
        dict.set_item("score", self.inner.score())?;
        dict.set_item("status", self.inner.status().as_str())?;
        dict.set_item("continuing", self.inner.is_continuing())?;
        dict.set_item("moved", outcome.moved)?;
        dict.set_item("score_delta", outcome.score_delta)?;
        Ok(dict.into())
    }
}

/// Direction constants for convenience.
#[pyclass]
struct Directions;

#[pymethods]
impl Directions {
    #[classattr]
    const UP: u8 = Direction::Up as u8;
    #[classattr]
    const DOWN: u8 = Direction::Down as u8;
    #[classattr]
    const LEFT: u8 = Direction::Left as u8;
    #[classattr]
    const RIGHT: u8 = Direction::Right as u8;
}

/// Python module for the merge puzzle.
#[pymodule]
fn merge_2048(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<Game>()?;
    m.add_class::<Directions>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_creation() {
        let game = Game::new(42, 2048, false).unwrap();
        assert_eq!(game.status(), "in_progress");
        assert_eq!(game.grid().concat().iter().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn test_determinism() {
        let game1 = Game::new(12345, 2048, false).unwrap();
        let game2 = Game::new(12345, 2048, false).unwrap();
        assert_eq!(game1.grid(), game2.grid());
    }

    #[test]
    fn test_bad_win_tile_rejected() {
        assert!(Game::new(1, 100, false).is_err());
    }

    #[test]
    fn test_step_rejects_unknown_direction() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let mut game = Game::new(1, 2048, false).unwrap();
            let grid = game.grid();
            let err = game.step(py, 9).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));
            assert_eq!(game.grid(), grid);
        });
    }
}
