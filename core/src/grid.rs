//! The 4x4 tile grid and the slide/merge algorithm.
//!
//! Cells are stored as a flat array of 16 values in row-major order
//! (indices 0-3 are row 0, 4-7 are row 1, etc.). Empty cells are 0, tiles
//! hold their face value (2, 4, 8, ...).

use crate::direction::Direction;
use crate::error::GridError;

/// Side length of the grid.
pub const SIZE: usize = 4;

/// Number of cells in the grid.
pub const CELLS: usize = SIZE * SIZE;

/// Largest tile a 4x4 board can hold when spawns may be 4s.
pub const MAX_TILE: u32 = 1 << 18;

/// Result of sliding a single line toward its wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSlide {
    /// The line after compaction, merging and re-expansion. Index 0 is the wall.
    pub line: [u32; SIZE],
    /// Sum of the merged tiles created.
    pub gained: u32,
    /// Number of merge events.
    pub merges: u32,
}

/// Result of sliding every line of a grid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub grid: Grid,
    pub gained: u32,
    pub merges: u32,
}

impl Shift {
    /// Whether the slide changed anything compared to `before`.
    pub fn changed(&self, before: &Grid) -> bool {
        self.grid != *before
    }
}

/// Slide one line toward index 0.
///
/// Zeros are dropped, then tiles are folded in from the wall outward: a tile
/// equal to the last placed tile merges with it unless that tile is itself
/// the product of a merge in this slide. The result is padded with zeros
/// away from the wall.
pub fn slide_line(line: [u32; SIZE]) -> LineSlide {
    let mut out = [0u32; SIZE];
    let mut merged = [false; SIZE];
    let mut len = 0;
    let mut gained = 0;
    let mut merges = 0;

    for value in line.into_iter().filter(|&v| v != 0) {
        if len > 0 && out[len - 1] == value && !merged[len - 1] {
            out[len - 1] = value * 2;
            merged[len - 1] = true;
            gained += value * 2;
            merges += 1;
        } else {
            out[len] = value;
            len += 1;
        }
    }

    LineSlide {
        line: out,
        gained,
        merges,
    }
}

/// Cell indices of line `line` for `direction`, ordered from the wall the
/// tiles travel toward to the opposite edge.
pub fn line_indices(direction: Direction, line: usize) -> [usize; SIZE] {
    let mut indices = [0; SIZE];
    for (k, slot) in indices.iter_mut().enumerate() {
        *slot = match direction {
            Direction::Left => line * SIZE + k,
            Direction::Right => line * SIZE + (SIZE - 1 - k),
            Direction::Up => k * SIZE + line,
            Direction::Down => (SIZE - 1 - k) * SIZE + line,
        };
    }
    indices
}

fn check_tile(index: usize, value: u32) -> Result<(), GridError> {
    if value != 0 && (value < 2 || !value.is_power_of_two()) {
        return Err(GridError::NotPowerOfTwo { index, value });
    }
    if value > MAX_TILE {
        return Err(GridError::TooLarge { index, value });
    }
    Ok(())
}

/// A 4x4 grid of tile values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid([u32; CELLS]);

impl Grid {
    /// A grid with every cell empty.
    pub const EMPTY: Grid = Grid([0; CELLS]);

    /// Build a grid from row-major cells, rejecting values that are not
    /// 0 or a power of two in `2..=MAX_TILE`.
    pub fn from_cells(cells: [u32; CELLS]) -> Result<Self, GridError> {
        for (index, &value) in cells.iter().enumerate() {
            check_tile(index, value)?;
        }
        Ok(Grid(cells))
    }

    /// Build a grid from a `[row][col]` array.
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Result<Self, GridError> {
        let mut cells = [0; CELLS];
        for (r, row) in rows.iter().enumerate() {
            cells[r * SIZE..(r + 1) * SIZE].copy_from_slice(row);
        }
        Grid::from_cells(cells)
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[u32; CELLS] {
        &self.0
    }

    /// The grid as a `[row][col]` array.
    pub fn rows(&self) -> [[u32; SIZE]; SIZE] {
        let mut rows = [[0; SIZE]; SIZE];
        for (r, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&self.0[r * SIZE..(r + 1) * SIZE]);
        }
        rows
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.0[row * SIZE + col]
    }

    pub(crate) fn set(&mut self, index: usize, value: u32) {
        self.0[index] = value;
    }

    /// Row-major indices of empty cells.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.0.iter().filter(|&&v| v == 0).count()
    }

    pub fn tile_count(&self) -> usize {
        CELLS - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|&v| v != 0)
    }

    pub fn max_tile(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.0.contains(&value)
    }

    /// Sum of all tile values.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Whether any tile has an equal right or bottom neighbour.
    pub fn has_adjacent_pair(&self) -> bool {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.get(row, col);
                if value == 0 {
                    continue;
                }
                if col + 1 < SIZE && self.get(row, col + 1) == value {
                    return true;
                }
                if row + 1 < SIZE && self.get(row + 1, col) == value {
                    return true;
                }
            }
        }
        false
    }

    /// Slide every line in `direction`. Does not spawn.
    pub fn shifted(&self, direction: Direction) -> Shift {
        let mut cells = self.0;
        let mut gained = 0;
        let mut merges = 0;

        for line in 0..SIZE {
            let indices = line_indices(direction, line);
            let slide = slide_line(indices.map(|i| cells[i]));
            for (slot, &i) in indices.iter().enumerate() {
                cells[i] = slide.line[slot];
            }
            gained += slide.gained;
            merges += slide.merges;
        }

        Shift {
            grid: Grid(cells),
            gained,
            merges,
        }
    }
}

impl TryFrom<&[u32]> for Grid {
    type Error = GridError;

    fn try_from(cells: &[u32]) -> Result<Self, Self::Error> {
        let cells: [u32; CELLS] = cells.try_into().map_err(|_| GridError::Length(cells.len()))?;
        Grid::from_cells(cells)
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {{")?;
        for row in self.rows() {
            for val in row {
                if val == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", val)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "+------+------+------+------+")?;
        for row in self.rows() {
            write!(f, "|")?;
            for val in row {
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}
