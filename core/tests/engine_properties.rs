//! Property tests for the move/spawn transition.
//!
//! Invariants covered:
//! - Slides conserve the tile sum and drop exactly one tile per merge.
//! - Each tile merges at most once per move (checked against a pairwise
//!   scan-and-skip oracle).
//! - Score grows by exactly the merge value of each effective move.
//! - Sliding an already-slid grid again never just moves tiles.
//! - An effective move adds exactly one spawned 2 or 4 to an empty cell.
//! - A lost game rejects every further move.
use merge_2048_core::{
    slide_line, Direction, Engine, EngineConfig, GameStatus, Grid, MoveOutcome,
};
use proptest::prelude::*;

fn tile() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => Just(0u32),
        4 => (1u32..=11).prop_map(|k| 1 << k),
    ]
}

fn grid() -> impl Strategy<Value = Grid> {
    prop::array::uniform16(tile()).prop_map(|cells| Grid::from_cells(cells).unwrap())
}

fn direction() -> impl Strategy<Value = Direction> {
    (0u8..4).prop_map(|d| Direction::from_u8(d).unwrap())
}

/// Compress, merge equal neighbours left to right skipping past each merge,
/// compress again.
fn oracle_slide(mut line: [u32; 4]) -> ([u32; 4], u32) {
    fn compress(line: &mut [u32; 4]) {
        let packed: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
        *line = [0; 4];
        line[..packed.len()].copy_from_slice(&packed);
    }

    compress(&mut line);
    let mut gained = 0;
    let mut i = 0;
    while i < 3 {
        if line[i] != 0 && line[i] == line[i + 1] {
            line[i] *= 2;
            gained += line[i];
            line[i + 1] = 0;
            i += 2;
        } else {
            i += 1;
        }
    }
    compress(&mut line);
    (line, gained)
}

#[test]
fn scenario_lines() {
    assert_eq!(slide_line([2, 2, 2, 2]).line, [4, 4, 0, 0]);
    // [2, 0, 2, 4] pushed right is [4, 2, 0, 2] seen from the right wall.
    assert_eq!(slide_line([4, 2, 0, 2]).line, [4, 4, 0, 0]);
}

#[test]
fn seeded_rollout_stays_consistent() {
    let mut game = Engine::new(20261016);
    let order = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];

    for i in 0..2000usize {
        if game.status() == GameStatus::Lost {
            break;
        }
        let before = game.score();
        let dir = order[i % 4];
        let outcome = game.step(dir);
        assert_eq!(game.score(), before + outcome.score_delta);
        for &v in game.cells() {
            assert!(v == 0 || (v >= 2 && v.is_power_of_two()));
        }
        if game.status() == GameStatus::Won {
            game.continue_playing();
        }
    }
}

proptest! {
    #[test]
    fn slide_conserves_sum_and_counts_merges(g in grid(), dir in direction()) {
        let shift = g.shifted(dir);
        prop_assert_eq!(shift.grid.total(), g.total());
        prop_assert_eq!(
            shift.grid.tile_count(),
            g.tile_count() - shift.merges as usize
        );
    }

    #[test]
    fn slide_line_matches_pairwise_oracle(line in prop::array::uniform4(tile())) {
        let slide = slide_line(line);
        let (expected, gained) = oracle_slide(line);
        prop_assert_eq!(slide.line, expected);
        prop_assert_eq!(slide.gained, gained);
    }

    #[test]
    fn second_slide_only_changes_by_merging(g in grid(), dir in direction()) {
        let once = g.shifted(dir).grid;
        let twice = once.shifted(dir);
        if twice.merges == 0 {
            prop_assert_eq!(twice.grid, once);
        }
    }

    #[test]
    fn step_adds_merge_score_and_one_spawn(
        g in grid(),
        dir in direction(),
        seed in any::<u64>(),
        score in 0u32..100_000,
    ) {
        let mut game = Engine::with_config(EngineConfig::default(), seed)
            .unwrap()
            .with_grid(g, score);
        let shift = g.shifted(dir);
        let outcome = game.step(dir);

        if shift.changed(&g) {
            prop_assert_eq!(outcome, MoveOutcome { moved: true, score_delta: shift.gained });
            prop_assert_eq!(game.score(), score + shift.gained);
            prop_assert_eq!(game.board().tile_count(), shift.grid.tile_count() + 1);

            let diffs: Vec<usize> = (0..16)
                .filter(|&i| game.cells()[i] != shift.grid.cells()[i])
                .collect();
            prop_assert_eq!(diffs.len(), 1);
            let i = diffs[0];
            prop_assert_eq!(shift.grid.cells()[i], 0);
            prop_assert!(game.cells()[i] == 2 || game.cells()[i] == 4);
        } else {
            prop_assert_eq!(outcome, MoveOutcome::default());
            prop_assert_eq!(game.score(), score);
            prop_assert_eq!(*game.board(), g);
        }
    }

    #[test]
    fn lost_games_reject_moves(seed in any::<u64>(), steps in 1usize..400) {
        let mut game = Engine::new(seed);
        for i in 0..steps {
            let legal = game.legal_moves();
            let next = Direction::ALL
                .into_iter()
                .cycle()
                .skip(i)
                .take(4)
                .find(|d| legal[d.index()]);
            let Some(dir) = next else {
                break;
            };
            game.step(dir);
            if game.status() == GameStatus::Won {
                game.continue_playing();
            }
        }

        if game.status() == GameStatus::Lost {
            let grid = *game.board();
            let score = game.score();
            for dir in Direction::ALL {
                prop_assert_eq!(game.step(dir), MoveOutcome::default());
            }
            prop_assert_eq!(*game.board(), grid);
            prop_assert_eq!(game.score(), score);
        }
    }
}
