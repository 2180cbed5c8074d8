#![no_std]

extern crate alloc;

use core::fmt;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use change::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod board;
mod change;
mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod types;

/// Cells around the first reveal that are kept clear of mines.
pub const SAFE_ZONE_CELLS: CellCount = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates a `size` x `size` board with `mines` mines.
    ///
    /// The mine count is refused rather than clamped, so a request can never
    /// silently change difficulty.
    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        let max_mines = Self::max_mines(size);
        if size == 0 || mines > max_mines {
            return Err(GameError::InvalidConfiguration {
                size,
                mines,
                max_mines,
            });
        }
        Ok(Self::new_unchecked(size, mines))
    }

    /// Largest mine count that still leaves a full safe zone free.
    pub const fn max_mines(size: Coord) -> CellCount {
        square(size).saturating_sub(SAFE_ZONE_CELLS)
    }
}

/// Classic board presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::VeryHard];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Easy => GameConfig::new_unchecked(10, 12),
            Medium => GameConfig::new_unchecked(15, 35),
            Hard => GameConfig::new_unchecked(20, 62),
            VeryHard => GameConfig::new_unchecked(30, 107),
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
            VeryHard => "veryhard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownDifficulty)
    }
}

/// Mine mask for a square board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    size: Coord,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn empty(size: Coord) -> Self {
        Self {
            mine_mask: Array2::default((usize::from(size), usize::from(size))),
            size,
            mine_count: 0,
        }
    }

    /// Builds a layout from explicit mine positions; out-of-range entries are
    /// skipped with a warning.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Self {
        let mut layout = Self::empty(size);
        for &coords in mine_coords {
            if coords.0 >= size || coords.1 >= size {
                log::warn!("Mine at {:?} lies outside a board of size {}", coords, size);
                continue;
            }
            layout.insert(coords);
        }
        layout
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mine_mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    /// Marks `coords` as mined, returning whether it was newly added.
    pub(crate) fn insert(&mut self, coords: Coord2) -> bool {
        let slot = &mut self.mine_mask[coords.to_nd_index()];
        if *slot {
            return false;
        }
        *slot = true;
        self.mine_count += 1;
        true
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_refuses_too_many_mines() {
        assert_eq!(
            GameConfig::new(8, 56),
            Err(GameError::InvalidConfiguration {
                size: 8,
                mines: 56,
                max_mines: 55,
            })
        );
        assert!(GameConfig::new(8, 55).is_ok());
    }

    #[test]
    fn config_refuses_empty_board() {
        assert!(matches!(
            GameConfig::new(0, 0),
            Err(GameError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn tiny_boards_only_allow_zero_mines() {
        assert_eq!(GameConfig::max_mines(2), 0);
        assert!(GameConfig::new(2, 0).is_ok());
        assert!(GameConfig::new(2, 1).is_err());
    }

    #[test]
    fn difficulty_presets_are_valid_configs() {
        for difficulty in Difficulty::ALL {
            let preset = difficulty.config();
            assert_eq!(GameConfig::new(preset.size, preset.mines), Ok(preset));
        }
        assert_eq!(Difficulty::Medium.config(), GameConfig::new_unchecked(15, 35));
    }

    #[test]
    fn difficulty_parses_by_name() {
        assert_eq!("veryhard".parse::<Difficulty>(), Ok(Difficulty::VeryHard));
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(
            "impossible".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty)
        );
    }

    #[test]
    fn layout_skips_out_of_range_and_duplicate_mines() {
        let layout = MineLayout::from_mine_coords(3, &[(0, 0), (0, 0), (3, 1), (2, 2)]);

        assert_eq!(layout.mine_count(), 2);
        assert!(layout.contains_mine((2, 2)));
        assert!(!layout.contains_mine((3, 1)));
        assert_eq!(layout.game_config(), GameConfig::new_unchecked(3, 2));
    }
}
