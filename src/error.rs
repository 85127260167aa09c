use thiserror::Error;

/// Failures surfaced by the simulation itself.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    /// Every tile is occupied, the apple has nowhere to go. This is the win
    /// condition, not a bug.
    #[error("no free tile left for the apple")]
    BoardFull,

    /// A coordinate that should exist in the grid or cycle did not resolve.
    /// Indicates an internal bug; callers log it and fall back to plain
    /// cycle-following.
    #[error("no node at ({x}, {y})")]
    NodeNotFound { x: i32, y: i32 },
}

/// Recoverable planner failures. Both degrade to cycle-following.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("no path to the target")]
    NoPathFound,

    #[error("search exceeded the expansion cap")]
    IterationLimitExceeded,
}
