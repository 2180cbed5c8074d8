use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible view of a whole game, for full redraws.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Coord,
    pub state: GameState,
    pub mines_remaining: isize,
    pub tiles: Array2<Tile>,
}

impl Snapshot {
    pub fn from_engine<G>(engine: &PlayEngine<G>) -> Self {
        let size = engine.size();
        let mut tiles = Array2::from_elem((usize::from(size), usize::from(size)), Tile::Hidden);

        for x in 0..size {
            for y in 0..size {
                let coords = (x, y);
                if let Some(tile) = engine.tile_at(coords) {
                    tiles[coords.to_nd_index()] = tile;
                }
            }
        }

        Self {
            size,
            state: engine.state(),
            mines_remaining: engine.mines_remaining(),
            tiles,
        }
    }

    pub fn tile(&self, coords: Coord2) -> Option<Tile> {
        self.tiles.get(coords.to_nd_index()).copied()
    }

    /// Tiles that still look closed.
    pub fn closed_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_closed()).count()
    }
}

impl<G> PlayEngine<G> {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_engine(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game_is_all_hidden() {
        let engine = PlayEngine::from_difficulty(Difficulty::Easy, 5);

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.size, 10);
        assert_eq!(snapshot.state, GameState::NotStarted);
        assert_eq!(snapshot.mines_remaining, 12);
        assert_eq!(snapshot.closed_count(), 100);
        assert!(snapshot.tiles.iter().all(|&tile| tile == Tile::Hidden));
    }

    #[test]
    fn snapshot_follows_reveals_and_marks() {
        let layout = MineLayout::from_mine_coords(4, &[(0, 0), (3, 3)]);
        let mut engine = PlayEngine::from_layout(layout);
        engine.reveal((1, 1));
        engine.toggle_flag((3, 3));

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.state, GameState::InProgress);
        assert_eq!(snapshot.mines_remaining, 1);
        assert_eq!(snapshot.tile((1, 1)), Some(Tile::Open(1)));
        assert_eq!(snapshot.tile((3, 3)), Some(Tile::Flagged));
        assert_eq!(snapshot.tile((0, 0)), Some(Tile::Hidden));
        assert_eq!(snapshot.tile((4, 0)), None);
        assert_eq!(snapshot.closed_count(), 15);
    }

    #[test]
    fn lost_snapshot_shows_mines() {
        let layout = MineLayout::from_mine_coords(3, &[(0, 0), (2, 2)]);
        let mut engine = PlayEngine::from_layout(layout);
        engine.reveal((0, 0));

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.state, GameState::Lost);
        assert_eq!(snapshot.tile((0, 0)), Some(Tile::Exploded));
        assert_eq!(snapshot.tile((2, 2)), Some(Tile::Mine));
        assert_eq!(snapshot.tile((1, 1)), Some(Tile::Hidden));
    }

    #[test]
    fn snapshot_serializes_for_renderers() {
        let engine = PlayEngine::new_game(3, 0, 1).unwrap();

        let json = serde_json::to_value(engine.snapshot()).unwrap();

        assert_eq!(json["state"], "NotStarted");
        assert_eq!(json["mines_remaining"], 0);
    }
}
