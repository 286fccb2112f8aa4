//! # merge-2048 WebAssembly Bindings
//!
//! JavaScript-friendly bindings to the merge puzzle engine using
//! wasm-bindgen. Wraps the core engine in a class-like API for web front
//! ends, which own rendering, gestures and animation.

use merge_2048_core::{Direction, Engine, EngineConfig, MoveOutcome, Snapshot};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Result of a step, serialized for JavaScript.
#[derive(Serialize)]
pub struct JsStepResult {
    /// The grid, score and status after the move.
    #[serde(flatten)]
    pub snapshot: Snapshot,
    /// Whether the grid changed.
    pub moved: bool,
    /// Points earned from this move.
    #[serde(rename = "scoreDelta")]
    pub score_delta: u32,
}

/// WebAssembly wrapper for one game session.
#[wasm_bindgen]
pub struct WasmGame {
    game: Engine,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game with the given seed and win tile (0 = 2048).
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, win_tile: u32) -> Result<WasmGame, JsError> {
        let mut config = EngineConfig::default();
        if win_tile != 0 {
            config = config.with_win_tile(win_tile);
        }
        let game = Engine::with_config(config, seed)?;
        Ok(WasmGame { game })
    }

    /// Reset the game to its initial state with a new seed.
    pub fn reset(&mut self, seed: u64) {
        self.game.reset_with_seed(seed);
    }

    /// Execute a move: 0 = Up, 1 = Down, 2 = Left, 3 = Right.
    ///
    /// Returns an object with `grid`, `score`, `status`, `continuing`,
    /// `max_tile`, `moved` and `scoreDelta`. Unknown codes leave the game
    /// untouched and report `moved: false`.
    pub fn step(&mut self, direction: u8) -> JsValue {
        let outcome = self.apply(direction);
        self.create_js_result(outcome)
    }

    /// Row-major grid as a Uint32Array of 16 cells.
    #[wasm_bindgen(js_name = getGrid)]
    pub fn get_grid(&self) -> Vec<u32> {
        self.game.cells().to_vec()
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.game.score()
    }

    /// "in_progress", "won" or "lost".
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> String {
        self.game.status().as_str().to_string()
    }

    /// Whether the player dismissed a win and kept playing.
    #[wasm_bindgen(js_name = isContinuing)]
    pub fn is_continuing(&self) -> bool {
        self.game.is_continuing()
    }

    /// Dismiss the win notification. Returns false if there was none.
    #[wasm_bindgen(js_name = continuePlaying)]
    pub fn continue_playing(&mut self) -> bool {
        self.game.continue_playing()
    }

    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.game.max_tile()
    }

    /// Legal moves as 4 flags [Up, Down, Left, Right].
    #[wasm_bindgen(js_name = getLegalMoves)]
    pub fn get_legal_moves(&self) -> Vec<u8> {
        self.game
            .legal_moves()
            .iter()
            .map(|&b| u8::from(b))
            .collect()
    }

    fn apply(&mut self, direction: u8) -> MoveOutcome {
        match Direction::from_u8(direction) {
            Some(dir) => self.game.step(dir),
            None => MoveOutcome::default(),
        }
    }

    fn create_js_result(&self, outcome: MoveOutcome) -> JsValue {
        let js_result = JsStepResult {
            snapshot: self.game.snapshot(),
            moved: outcome.moved,
            score_delta: outcome.score_delta,
        };
        serde_wasm_bindgen::to_value(&js_result).unwrap_or(JsValue::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_direction_leaves_game_untouched() {
        let mut wrapper = WasmGame { game: Engine::new(7) };
        let grid = wrapper.get_grid();
        let score = wrapper.get_score();

        for code in [4, 9, 255] {
            assert_eq!(wrapper.apply(code), MoveOutcome::default());
        }
        assert_eq!(wrapper.get_grid(), grid);
        assert_eq!(wrapper.get_score(), score);
        assert_eq!(wrapper.get_status(), "in_progress");
    }

    #[test]
    fn test_known_direction_reaches_engine() {
        let mut wrapper = WasmGame { game: Engine::new(7) };
        let legal = wrapper.get_legal_moves();
        let code = legal.iter().position(|&l| l == 1).unwrap() as u8;
        assert!(wrapper.apply(code).moved);
    }
}
