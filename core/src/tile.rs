use serde::{Deserialize, Serialize};

/// Player-facing state of a single cell; exactly one holds at any time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Questioned,
    Revealed,
}

impl CellState {
    /// The visual mark of an unrevealed cell.
    pub const fn mark(self) -> Mark {
        match self {
            Self::Flagged => Mark::Flagged,
            Self::Questioned => Mark::Questioned,
            Self::Hidden | Self::Revealed => Mark::None,
        }
    }
}

/// Mark shown on a hidden cell, as cycled by flag toggling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mark {
    None,
    Flagged,
    Questioned,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    mine: bool,
    adjacent_mines: u8,
    state: CellState,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    /// Only meaningful for cells that are not mines.
    pub const fn adjacent_mine_count(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    /// Hidden or questioned, i.e. open to revelation.
    pub const fn is_revealable(&self) -> bool {
        matches!(self.state, CellState::Hidden | CellState::Questioned)
    }

    pub(crate) fn arm(&mut self) {
        self.mine = true;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }
}

/// Cell appearance as a renderer draws it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Hidden,
    Flagged,
    Questioned,
    Open(u8),
    // these are only used to show result after the game is lost:
    Exploded,
    Mine,
    IncorrectFlag,
}

impl Tile {
    // whether the tile is visually closed
    pub const fn is_closed(self) -> bool {
        use Tile::*;
        match self {
            Hidden => true,
            Flagged => true,
            Questioned => true,
            Open(_) => false,
            Exploded => false,
            Mine => false,
            IncorrectFlag => true,
        }
    }
}

impl From<Mark> for Tile {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::None => Tile::Hidden,
            Mark::Flagged => Tile::Flagged,
            Mark::Questioned => Tile::Questioned,
        }
    }
}
