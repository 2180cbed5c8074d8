use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// What happened to a single cell during an action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChangeKind {
    Revealed { adjacent_mines: u8 },
    Exploded,
    MineShown,
    FlaggedCorrect,
    FlaggedIncorrect,
    FlagUpdate { mark: Mark },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub x: Coord,
    pub y: Coord,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

impl Change {
    pub const fn new((x, y): Coord2, kind: ChangeKind) -> Self {
        Self { x, y, kind }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }
}

/// Whether an action ended the game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    #[default]
    Continue,
    Won,
    Lost,
}

impl ActionOutcome {
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Ordered cell changes produced by one action, plus its outcome.
///
/// The outcome only reports a game ending caused by this action; a no-op on
/// an already finished game reports [`ActionOutcome::Continue`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<Change>,
    pub outcome: ActionOutcome,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn game_over(&self) -> bool {
        self.outcome.is_game_over()
    }

    pub fn won(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Won)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub(crate) fn push(&mut self, coords: Coord2, kind: ChangeKind) {
        self.changes.push(Change::new(coords, kind));
    }

    /// Appends `other`, keeping the last game-ending outcome seen.
    pub fn merge(&mut self, other: ChangeSet) {
        self.changes.extend(other.changes);
        if other.outcome.is_game_over() {
            self.outcome = other.outcome;
        }
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = core::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
