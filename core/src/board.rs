use core::ops::Index;
use ndarray::Array2;

use crate::*;

/// Totals that actions maintain incrementally and that can be recomputed
/// from the cell matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardCounts {
    /// Revealed cells that are not mines.
    pub revealed: CellCount,
    pub flagged: CellCount,
}

/// Square matrix of cells with running totals.
///
/// `revealed_count` only counts safe cells, so the exploded mine of a lost
/// game does not contribute to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    size: Coord,
    mine_count: CellCount,
    revealed_count: CellCount,
    flagged_count: CellCount,
    mines_placed: bool,
}

impl Board {
    pub fn new(config: GameConfig) -> Self {
        let side = usize::from(config.size);
        Self {
            cells: Array2::default((side, side)),
            size: config.size,
            mine_count: config.mines,
            revealed_count: 0,
            flagged_count: 0,
            mines_placed: false,
        }
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        square(self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    /// The cell at `coords`, or `None` when out of range.
    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, (self.size, self.size))
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        self.iter_neighbors(coords).collect()
    }

    pub fn count_neighbors(&self, coords: Coord2, predicate: impl Fn(&Cell) -> bool) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| predicate(&self[pos]))
            .count();
        // at most 8 neighbors
        count as u8
    }

    /// Every cell in `x`-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, &Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((x, y), cell)| ((x as Coord, y as Coord), cell))
    }

    /// Arms every mine of `layout` and computes adjacency counts, once.
    ///
    /// A layout whose size or mine count differs from the board is refused
    /// and leaves the board unplaced.
    pub(crate) fn place_mines(&mut self, layout: &MineLayout) -> Result<()> {
        if self.mines_placed {
            log::warn!("Mines were already placed, ignoring a second layout");
            return Ok(());
        }
        if layout.size() != self.size || layout.mine_count() != self.mine_count {
            return Err(GameError::LayoutMismatch {
                expected: GameConfig::new_unchecked(self.size, self.mine_count),
                actual: layout.game_config(),
            });
        }

        for coords in layout.iter_mines() {
            self.cells[coords.to_nd_index()].arm();
        }

        let size = self.size;
        for x in 0..size {
            for y in 0..size {
                let coords = (x, y);
                if self[coords].is_mine() {
                    continue;
                }
                let adjacent = self.count_neighbors(coords, Cell::is_mine);
                self.cells[coords.to_nd_index()].set_adjacent_mines(adjacent);
            }
        }

        self.mines_placed = true;
        Ok(())
    }

    /// Moves the cell at `coords` to `state`, keeping the totals in step.
    pub(crate) fn set_state(&mut self, coords: Coord2, state: CellState) {
        let cell = &mut self.cells[coords.to_nd_index()];
        let previous = cell.state();
        if previous == state {
            return;
        }
        let counts_as_safe = !cell.is_mine();
        cell.set_state(state);

        if previous == CellState::Flagged {
            self.flagged_count -= 1;
        }
        if state == CellState::Flagged {
            self.flagged_count += 1;
        }
        if counts_as_safe {
            if previous == CellState::Revealed {
                self.revealed_count -= 1;
            }
            if state == CellState::Revealed {
                self.revealed_count += 1;
            }
        }
    }

    /// Every non-mine cell has been revealed.
    pub fn is_cleared(&self) -> bool {
        self.mines_placed && self.revealed_count == self.total_cells() - self.mine_count
    }

    /// The flagged set equals the mine set exactly.
    pub fn flags_match_mines(&self) -> bool {
        self.mines_placed
            && self.flagged_count == self.mine_count
            && self
                .cells
                .iter()
                .all(|cell| cell.is_flagged() == cell.is_mine())
    }

    /// Non-mine cells not yet revealed.
    pub fn hidden_safe_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| !cell.is_mine() && !cell.is_revealed())
            .count() as CellCount
    }

    /// Recomputes the running totals from the cell matrix.
    pub fn recount(&self) -> BoardCounts {
        self.cells
            .iter()
            .fold(BoardCounts::default(), |mut counts, cell| {
                if cell.is_revealed() && !cell.is_mine() {
                    counts.revealed += 1;
                }
                if cell.is_flagged() {
                    counts.flagged += 1;
                }
                counts
            })
    }

    pub fn counts(&self) -> BoardCounts {
        BoardCounts {
            revealed: self.revealed_count,
            flagged: self.flagged_count,
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(size: Coord, mines: &[Coord2]) -> Board {
        let layout = MineLayout::from_mine_coords(size, mines);
        let mut board = Board::new(layout.game_config());
        board.place_mines(&layout).unwrap();
        board
    }

    #[test]
    fn cell_at_is_absent_out_of_range() {
        let board = Board::new(GameConfig::new_unchecked(4, 0));

        assert!(board.cell_at((3, 3)).is_some());
        assert!(board.cell_at((4, 0)).is_none());
        assert!(board.cell_at((0, 255)).is_none());
        assert!(board.neighbors((4, 4)).is_empty());
    }

    #[test]
    fn placement_computes_adjacent_counts() {
        let board = board_with(3, &[(0, 0), (2, 0)]);

        assert!(board.mines_placed());
        assert_eq!(board[(1, 0)].adjacent_mine_count(), 2);
        assert_eq!(board[(1, 1)].adjacent_mine_count(), 2);
        assert_eq!(board[(0, 1)].adjacent_mine_count(), 1);
        assert_eq!(board[(1, 2)].adjacent_mine_count(), 0);
    }

    #[test]
    fn placement_is_latched() {
        let mut board = board_with(3, &[(0, 0)]);
        board
            .place_mines(&MineLayout::from_mine_coords(3, &[(2, 2)]))
            .unwrap();

        assert!(board[(0, 0)].is_mine());
        assert!(!board[(2, 2)].is_mine());
        assert_eq!(board.mine_count(), 1);
    }

    #[test]
    fn mismatched_layout_is_refused() {
        let mut board = Board::new(GameConfig::new(5, 4).unwrap());
        let layout = MineLayout::from_mine_coords(5, &[(0, 0), (4, 4)]);

        assert_eq!(
            board.place_mines(&layout),
            Err(GameError::LayoutMismatch {
                expected: GameConfig::new_unchecked(5, 4),
                actual: GameConfig::new_unchecked(5, 2),
            })
        );
        assert!(!board.mines_placed());
        assert_eq!(board.mine_count(), 4);
        assert!(!board[(0, 0)].is_mine());

        let wrong_size = MineLayout::from_mine_coords(6, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert!(board.place_mines(&wrong_size).is_err());
        assert!(!board.mines_placed());
    }

    #[test]
    fn state_changes_keep_counts_in_step() {
        let mut board = board_with(3, &[(0, 0)]);

        board.set_state((1, 1), CellState::Revealed);
        board.set_state((0, 0), CellState::Flagged);
        board.set_state((2, 2), CellState::Flagged);
        board.set_state((2, 2), CellState::Questioned);

        assert_eq!(board.counts(), BoardCounts { revealed: 1, flagged: 1 });
        assert_eq!(board.recount(), board.counts());
        assert_eq!(board.hidden_safe_count(), 7);
    }

    #[test]
    fn revealed_mine_is_not_counted_as_safe() {
        let mut board = board_with(3, &[(0, 0)]);

        board.set_state((0, 0), CellState::Revealed);

        assert_eq!(board.revealed_count(), 0);
        assert_eq!(board.recount(), board.counts());
    }

    #[test]
    fn flags_must_match_mines_exactly() {
        let mut board = board_with(4, &[(0, 0), (3, 3)]);

        board.set_state((0, 0), CellState::Flagged);
        board.set_state((1, 1), CellState::Flagged);
        assert!(!board.flags_match_mines());

        board.set_state((1, 1), CellState::Hidden);
        board.set_state((3, 3), CellState::Flagged);
        assert!(board.flags_match_mines());
        assert!(!board.is_cleared());
    }

    #[test]
    fn unplaced_board_is_never_won() {
        let board = Board::new(GameConfig::new_unchecked(3, 0));

        assert!(!board.flags_match_mines());
        assert!(!board.is_cleared());
    }
}
