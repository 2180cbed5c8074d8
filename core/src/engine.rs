use alloc::collections::VecDeque;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No reveal yet, mines not placed
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// The game has ended and no moves are accepted anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from first reveal to win or loss.
///
/// Every action is synchronous and returns the cells it changed. Invalid
/// actions (out-of-range coordinates, settled cells, finished games) are
/// no-ops with an empty [`ChangeSet`].
#[derive(Clone, Debug)]
pub struct PlayEngine<G = RandomMineGenerator> {
    config: GameConfig,
    board: Board,
    generator: Option<G>,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl PlayEngine {
    /// A `size` x `size` game whose mines come from a generator seeded with `seed`.
    pub fn new_game(size: Coord, mines: CellCount, seed: u64) -> Result<Self> {
        Self::with_generator(GameConfig { size, mines }, RandomMineGenerator::seeded(seed))
    }

    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::from_parts(difficulty.config(), RandomMineGenerator::seeded(seed))
    }
}

impl PlayEngine<MineLayout> {
    /// A game replaying a fixed layout; the first reveal is not protected.
    pub fn from_layout(layout: MineLayout) -> Self {
        Self::from_parts(layout.game_config(), layout)
    }
}

impl<G> PlayEngine<G> {
    /// A game drawing its mines from `generator`.
    ///
    /// `config` is validated like [`GameConfig::new`], so a mine count that
    /// does not fit the board is refused rather than reduced.
    pub fn with_generator(config: GameConfig, generator: G) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        Ok(Self::from_parts(config, generator))
    }

    fn from_parts(config: GameConfig, generator: G) -> Self {
        Self {
            config,
            board: Board::new(config),
            generator: Some(generator),
            state: GameState::default(),
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.board.revealed_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.board.flagged_count()
    }

    pub fn mines_placed(&self) -> bool {
        self.board.mines_placed()
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_remaining(&self) -> isize {
        (self.board.mine_count() as isize) - (self.board.flagged_count() as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.board.cell_at(coords)
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        self.board.neighbors(coords)
    }

    /// The mine that ended a lost game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Whether [`chord`](Self::chord) at `coords` would reveal anything.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if self.state.is_finished() {
            return false;
        }

        match self.board.cell_at(coords) {
            Some(cell) if cell.is_revealed() && !cell.is_mine() => {
                let count = cell.adjacent_mine_count();
                count > 0 && count == self.board.count_neighbors(coords, Cell::is_flagged)
            }
            _ => false,
        }
    }

    /// Appearance of the cell at `coords`; mines only show once the game is lost.
    pub fn tile_at(&self, coords: Coord2) -> Option<Tile> {
        let cell = self.board.cell_at(coords)?;
        let lost = matches!(self.state, GameState::Lost);

        Some(match cell.state() {
            CellState::Revealed if cell.is_mine() => Tile::Exploded,
            CellState::Revealed => Tile::Open(cell.adjacent_mine_count()),
            CellState::Flagged if lost && !cell.is_mine() => Tile::IncorrectFlag,
            CellState::Hidden | CellState::Questioned if lost && cell.is_mine() => Tile::Mine,
            state => state.mark().into(),
        })
    }

    fn finish(&mut self, won: bool, changes: &mut ChangeSet) {
        if self.state.is_finished() {
            return;
        }

        if won {
            self.state = GameState::Won;
            changes.outcome = ActionOutcome::Won;
            log::debug!(
                "Game won, {} cells revealed, {} flags",
                self.board.revealed_count(),
                self.board.flagged_count()
            );
        } else {
            self.state = GameState::Lost;
            changes.outcome = ActionOutcome::Lost;
            log::debug!("Game lost at {:?}", self.triggered_mine);
        }
    }

    /// Clearance win or flag win.
    fn check_win(&mut self, changes: &mut ChangeSet) {
        if self.board.is_cleared() || self.board.flags_match_mines() {
            self.finish(true, changes);
        }
    }

    /// Cycles hidden -> flagged -> questioned -> hidden.
    pub fn toggle_flag(&mut self, coords: Coord2) -> ChangeSet {
        let mut changes = ChangeSet::new();
        if self.state.is_finished() {
            return changes;
        }

        let Some(cell) = self.board.cell_at(coords) else {
            return changes;
        };
        let previous = cell.state();
        let next = match previous {
            CellState::Hidden => CellState::Flagged,
            CellState::Flagged => CellState::Questioned,
            CellState::Questioned => CellState::Hidden,
            CellState::Revealed => return changes,
        };

        self.board.set_state(coords, next);
        changes.push(coords, ChangeKind::FlagUpdate { mark: next.mark() });
        log::trace!("Mark at {:?}: {:?} -> {:?}", coords, previous, next);

        if previous == CellState::Flagged || next == CellState::Flagged {
            self.check_win(&mut changes);
        }
        changes
    }
}

impl<G: MineGenerator> PlayEngine<G> {
    /// Reveals the cell at `coords`, flooding through zero-count regions.
    ///
    /// The first successful reveal places the mines around a safe zone
    /// centered on `coords`.
    pub fn reveal(&mut self, coords: Coord2) -> ChangeSet {
        let mut changes = ChangeSet::new();
        if self.state.is_finished() {
            return changes;
        }

        match self.board.cell_at(coords) {
            Some(cell) if cell.is_revealable() => {}
            _ => return changes,
        }

        if let Err(err) = self.ensure_mines(coords) {
            log::error!("Cannot start the game: {}", err);
            return changes;
        }

        if self.board[coords].is_mine() {
            self.explode(coords, &mut changes);
            return changes;
        }

        self.flood_reveal(coords, &mut changes);
        log::debug!("Reveal at {:?} opened {} cells", coords, changes.len());

        self.check_win(&mut changes);
        changes
    }

    /// Reveals the unflagged hidden neighbors of a numbered cell once the
    /// flags around it account for all of its mines.
    ///
    /// Every qualifying neighbor is attempted in order; once one ends the
    /// game the remaining reveals are no-ops.
    pub fn chord(&mut self, coords: Coord2) -> ChangeSet {
        let mut changes = ChangeSet::new();
        if !self.can_chord_at(coords) {
            return changes;
        }

        let targets: Neighbors = self
            .board
            .iter_neighbors(coords)
            .filter(|&pos| self.board[pos].is_revealable())
            .collect();
        log::debug!("Chord at {:?} over {} cells", coords, targets.len());

        for target in targets {
            changes.merge(self.reveal(target));
        }
        changes
    }

    /// Primary action: chord on a revealed numbered cell, reveal otherwise.
    pub fn open(&mut self, coords: Coord2) -> ChangeSet {
        match self.board.cell_at(coords) {
            Some(cell) if cell.is_revealed() && cell.adjacent_mine_count() > 0 => {
                self.chord(coords)
            }
            _ => self.reveal(coords),
        }
    }

    fn ensure_mines(&mut self, start: Coord2) -> Result<()> {
        if let Some(generator) = self.generator.take() {
            let layout = generator.generate(self.config, start);
            self.board.place_mines(&layout)?;
        }
        if !self.board.mines_placed() {
            return Err(GameError::MinesUnavailable);
        }

        if self.state.is_initial() {
            self.state = GameState::InProgress;
        }
        Ok(())
    }

    fn explode(&mut self, coords: Coord2, changes: &mut ChangeSet) {
        self.board.set_state(coords, CellState::Revealed);
        self.triggered_mine = Some(coords);
        changes.push(coords, ChangeKind::Exploded);

        for (pos, cell) in self.board.iter_cells() {
            if pos == coords {
                continue;
            }
            let kind = match (cell.is_mine(), cell.is_flagged()) {
                (true, false) => ChangeKind::MineShown,
                (true, true) => ChangeKind::FlaggedCorrect,
                (false, true) => ChangeKind::FlaggedIncorrect,
                (false, false) => continue,
            };
            changes.push(pos, kind);
        }

        self.finish(false, changes);
    }

    /// Work-list flood fill; cells are marked when queued so none is visited twice.
    fn flood_reveal(&mut self, start: Coord2, changes: &mut ChangeSet) {
        let size = usize::from(self.board.size());
        let mut queued: Array2<bool> = Array2::default((size, size));
        queued[start.to_nd_index()] = true;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = self.board[coords];
            if !cell.is_revealable() || cell.is_mine() {
                continue;
            }

            let adjacent_mines = cell.adjacent_mine_count();
            self.board.set_state(coords, CellState::Revealed);
            changes.push(coords, ChangeKind::Revealed { adjacent_mines });
            log::trace!("Revealed {:?}, adjacent mines: {}", coords, adjacent_mines);

            if adjacent_mines == 0 {
                for pos in self.board.iter_neighbors(coords) {
                    let slot = &mut queued[pos.to_nd_index()];
                    if !*slot && self.board[pos].is_revealable() {
                        *slot = true;
                        to_visit.push_back(pos);
                    }
                }
            }
        }
    }
}
