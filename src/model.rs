pub(crate) const DEFAULT_HOLE_COUNT: usize = 5;
pub(crate) const MAX_HOLE_COUNT: usize = 9;

/// One flag per hole, `true` while a frog is up.
pub(crate) type HoleState = Vec<bool>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    NotStarted,
    InProgress,
    Over,
}

/// Snapshot of everything the view needs. Never mutated once published by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GameState {
    pub(crate) phase: Phase,
    pub(crate) holes: HoleState,
    pub(crate) score: u32,
}

impl GameState {
    pub(crate) fn new(hole_count: usize) -> Self {
        Self {
            phase: Phase::NotStarted,
            holes: vec![false; hole_count],
            score: 0,
        }
    }

    pub(crate) fn hole_count(&self) -> usize {
        self.holes.len()
    }

    pub(crate) fn is_active(&self, hole: usize) -> bool {
        self.holes.get(hole).copied().unwrap_or(false)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.holes.iter().filter(|h| **h).count()
    }
}
