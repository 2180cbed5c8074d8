use crate::*;
pub use random::*;

mod random;

/// Source of mine positions, consulted once per game at the first reveal.
pub trait MineGenerator {
    fn generate(self, config: GameConfig, start: Coord2) -> MineLayout;
}

/// A fixed layout replays as-is; the start cell is not protected.
impl MineGenerator for MineLayout {
    fn generate(self, config: GameConfig, start: Coord2) -> MineLayout {
        if self.size() != config.size || self.mine_count() != config.mines {
            log::warn!(
                "Fixed layout ({}x{}, {} mines) does not match config {:?}",
                self.size(),
                self.size(),
                self.mine_count(),
                config
            );
        }
        if self.contains_mine(start) {
            log::debug!("Fixed layout has a mine under the first reveal at {:?}", start);
        }
        self
    }
}
