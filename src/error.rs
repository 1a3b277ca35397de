use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum GameError {
    #[error("hole {id} does not exist (board has {hole_count} holes)")]
    InvalidHoleId { id: usize, hole_count: usize },
}
