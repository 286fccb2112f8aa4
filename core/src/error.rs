use std::io;

/// A direction code outside 0-3.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid direction code {0} (expected 0-3)")]
pub struct DirectionError(pub u8);

/// Rejected board imports.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("expected 16 cells, got {0}")]
    Length(usize),
    #[error("cell {index} holds {value}, which is neither empty nor a power of two >= 2")]
    NotPowerOfTwo { index: usize, value: u32 },
    #[error("cell {index} holds {value}, larger than any tile a 4x4 board can reach")]
    TooLarge { index: usize, value: u32 },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("win tile {0} must be a power of two between 4 and 262144")]
    InvalidWinTile(u32),
    #[error("four probability {0} must lie within [0, 1]")]
    InvalidFourProbability(f64),
}
