use serde::Serialize;

use crate::grid::SIZE;

/// Where a session stands, derived from the engine's latches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    /// The win tile has appeared and the player has not chosen to continue yet.
    Won,
    /// Full grid with no equal neighbours. Terminal until reset.
    Lost,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoveOutcome {
    /// Whether the grid changed (and a tile was spawned).
    pub moved: bool,
    /// Points earned from merges in this move.
    pub score_delta: u32,
}

/// Read-only view of an engine handed to renderers and bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub grid: [[u32; SIZE]; SIZE],
    pub score: u32,
    pub status: GameStatus,
    /// The player dismissed a win and kept playing.
    pub continuing: bool,
    pub max_tile: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(GameStatus::InProgress.to_string(), "in_progress");
        assert_eq!(GameStatus::Won.as_str(), "won");
        assert_eq!(GameStatus::Lost.as_str(), "lost");
    }

    #[test]
    fn test_default_outcome_is_ineffective() {
        let outcome = MoveOutcome::default();
        assert!(!outcome.moved);
        assert_eq!(outcome.score_delta, 0);
    }
}
