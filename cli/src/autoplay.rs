use mnswpr_core::{CellCount, ChangeSet, Coord2, MineGenerator, PlayEngine, Tile};
use rand::Rng;
use serde::Serialize;

/// A single player action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Move {
    Reveal(Coord2),
    Chord(Coord2),
    Flag(Coord2),
}

impl Move {
    pub fn apply<G: MineGenerator>(self, engine: &mut PlayEngine<G>) -> ChangeSet {
        match self {
            Move::Reveal(coords) => engine.reveal(coords),
            Move::Chord(coords) => engine.chord(coords),
            Move::Flag(coords) => engine.toggle_flag(coords),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub won: bool,
    pub moves: usize,
    pub guesses: usize,
    pub revealed: CellCount,
    pub mines_remaining: isize,
}

/// Plays from the visible tiles only: chords or flags what single clues
/// settle, and guesses uniformly among hidden cells otherwise.
#[derive(Debug)]
pub struct AutoPlayer<R> {
    rng: R,
}

impl<R: Rng> AutoPlayer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// The next move, and whether it is a guess; `None` once the game ended.
    pub fn next_move<G>(&mut self, engine: &PlayEngine<G>) -> Option<(Move, bool)> {
        if engine.is_finished() {
            return None;
        }

        let size = engine.size();
        if !engine.mines_placed() {
            return Some((Move::Reveal((size / 2, size / 2)), false));
        }

        let mut hidden_cells = Vec::new();
        for x in 0..size {
            for y in 0..size {
                let coords = (x, y);
                match engine.tile_at(coords) {
                    Some(Tile::Open(count)) if count > 0 => {
                        if let Some(deduced) = deduce(engine, coords, count) {
                            return Some((deduced, false));
                        }
                    }
                    Some(Tile::Hidden) => hidden_cells.push(coords),
                    _ => {}
                }
            }
        }

        if hidden_cells.is_empty() {
            log::warn!("No hidden cells left on an unfinished game");
            return None;
        }
        let pick = hidden_cells[self.rng.random_range(0..hidden_cells.len())];
        Some((Move::Reveal(pick), true))
    }

    /// Plays `engine` to the end, handing every move and its changes to `on_move`.
    pub fn play<G: MineGenerator>(
        &mut self,
        engine: &mut PlayEngine<G>,
        mut on_move: impl FnMut(Move, &ChangeSet),
    ) -> GameReport {
        let mut report = GameReport::default();

        while let Some((next, guess)) = self.next_move(engine) {
            let changes = next.apply(engine);
            log::trace!("{:?} changed {} cells", next, changes.len());
            report.moves += 1;
            if guess {
                report.guesses += 1;
            }
            on_move(next, &changes);
            if changes.game_over() {
                report.won = changes.won();
            }
        }

        report.revealed = engine.revealed_count();
        report.mines_remaining = engine.mines_remaining();
        report
    }
}

/// What the clue at `coords` settles on its own, if anything.
fn deduce<G>(engine: &PlayEngine<G>, coords: Coord2, count: u8) -> Option<Move> {
    let mut flagged = 0;
    let mut hidden = Vec::with_capacity(8);
    for pos in engine.neighbors(coords) {
        match engine.tile_at(pos) {
            Some(Tile::Flagged) => flagged += 1,
            Some(Tile::Hidden) => hidden.push(pos),
            _ => {}
        }
    }

    if hidden.is_empty() {
        return None;
    }
    if flagged == count {
        return Some(Move::Chord(coords));
    }
    if usize::from(flagged) + hidden.len() == usize::from(count) {
        return Some(Move::Flag(hidden[0]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnswpr_core::{Difficulty, MineLayout};
    use rand::{SeedableRng, rngs::SmallRng};

    fn player(seed: u64) -> AutoPlayer<SmallRng> {
        AutoPlayer::new(SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn empty_board_is_won_in_one_move() {
        let mut engine = PlayEngine::new_game(6, 0, 1).unwrap();

        let report = player(0).play(&mut engine, |_, _| {});

        assert!(report.won);
        assert_eq!(report.moves, 1);
        assert_eq!(report.guesses, 0);
        assert_eq!(report.revealed, 36);
    }

    #[test]
    fn games_always_finish_and_flags_are_correct() {
        for seed in 0..20 {
            let mut engine = PlayEngine::from_difficulty(Difficulty::Easy, seed);
            let mut flags = Vec::new();

            let report = player(seed).play(&mut engine, |next, _| {
                if let Move::Flag(coords) = next {
                    flags.push(coords);
                }
            });

            assert!(engine.is_finished());
            assert_eq!(report.won, engine.state() == mnswpr_core::GameState::Won);
            for coords in flags {
                assert!(engine.cell_at(coords).unwrap().is_mine());
            }
        }
    }

    #[test]
    fn settled_clue_is_chorded() {
        let layout = MineLayout::from_mine_coords(5, &[(0, 1), (2, 1), (4, 4)]);
        let mut engine = PlayEngine::from_layout(layout);
        engine.reveal((1, 1));
        engine.toggle_flag((0, 1));
        engine.toggle_flag((2, 1));

        assert_eq!(
            player(0).next_move(&engine),
            Some((Move::Chord((1, 1)), false))
        );
    }

    #[test]
    fn moves_serialize_as_tagged_coordinates() {
        let json = serde_json::to_value(Move::Flag((2, 3))).unwrap();

        assert_eq!(json, serde_json::json!({"flag": [2, 3]}));
    }
}
