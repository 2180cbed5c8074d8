use alloc::vec::Vec;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;

/// Uniform placement that keeps the start cell and its neighbors clear.
///
/// Candidates are every cell outside the safe zone; a partial Fisher-Yates
/// shuffle picks the mines in `mines` swaps.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineGenerator<R = SmallRng> {
    rng: R,
}

impl RandomMineGenerator<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomMineGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

/// Whether `coords` lies within the 3x3 block centered on `start`.
pub fn in_safe_zone(coords: Coord2, start: Coord2) -> bool {
    coords.0.abs_diff(start.0) <= 1 && coords.1.abs_diff(start.1) <= 1
}

impl<R: Rng> MineGenerator for RandomMineGenerator<R> {
    fn generate(mut self, config: GameConfig, start: Coord2) -> MineLayout {
        let size = config.size;

        let mut candidates: Vec<Coord2> = (0..size)
            .flat_map(|x| (0..size).map(move |y| (x, y)))
            .filter(|&coords| !in_safe_zone(coords, start))
            .collect();

        let wanted = usize::from(config.mines);
        if wanted > candidates.len() {
            log::warn!(
                "Only {} cells outside the safe zone, requested {} mines",
                candidates.len(),
                wanted
            );
        }
        let count = wanted.min(candidates.len());

        for i in 0..count {
            let j = self.rng.random_range(i..candidates.len());
            candidates.swap(i, j);
        }

        let layout = MineLayout::from_mine_coords(size, &candidates[..count]);
        log::debug!(
            "Placed {} mines on a {}x{} board, safe zone around {:?}",
            layout.mine_count(),
            size,
            size,
            start
        );
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_zone_never_receives_mines() {
        let config = GameConfig::new(8, 55).unwrap();

        for seed in 0..32 {
            for start in [(0, 0), (3, 4), (7, 7), (0, 5)] {
                let layout = RandomMineGenerator::seeded(seed).generate(config, start);

                assert_eq!(layout.mine_count(), 55);
                assert!(layout.iter_mines().all(|mine| !in_safe_zone(mine, start)));
            }
        }
    }

    #[test]
    fn corner_start_leaves_room_for_more_mines() {
        // a corner safe zone only covers 4 cells
        let config = GameConfig::new_unchecked(4, 12);
        let layout = RandomMineGenerator::seeded(3).generate(config, (0, 0));

        assert_eq!(layout.mine_count(), 12);
        for coords in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert!(!layout.contains_mine(coords));
        }
    }

    #[test]
    fn overfull_request_is_capped_by_candidates() {
        let config = GameConfig::new_unchecked(3, 5);
        let layout = RandomMineGenerator::seeded(1).generate(config, (1, 1));

        assert_eq!(layout.mine_count(), 0);
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = Difficulty::Hard.config();

        let a = RandomMineGenerator::seeded(42).generate(config, (10, 10));
        let b = RandomMineGenerator::seeded(42).generate(config, (10, 10));

        assert_eq!(a, b);
    }
}
