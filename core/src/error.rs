use thiserror::Error;

use crate::{CellCount, Coord, GameConfig};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {mines} mines on a {size}x{size} board, at most {max_mines}")]
    InvalidConfiguration {
        size: Coord,
        mines: CellCount,
        max_mines: CellCount,
    },
    #[error("Unknown difficulty")]
    UnknownDifficulty,
    #[error("Generated layout {actual:?} does not match the game {expected:?}")]
    LayoutMismatch {
        expected: GameConfig,
        actual: GameConfig,
    },
    #[error("No mine layout is available for this game")]
    MinesUnavailable,
}

pub type Result<T> = core::result::Result<T, GameError>;
