use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("field must be at least 1x1 tiles, got {width}x{height}")]
    EmptyField { width: u16, height: u16 },

    #[error("clock went backwards: update at {now}ms is before the last move at {last}ms")]
    ClockWentBackwards { now: u64, last: u64 },
}

pub type Result<T> = std::result::Result<T, GameError>;
