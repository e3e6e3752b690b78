use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("unknown tire compound: {0:?}")]
    UnknownCompound(String),
    #[error("invalid lap count {laps}: a stint must run between 1 and {max} laps")]
    InvalidLapCount { laps: i64, max: u32 },
    #[error("strategy has no stints")]
    EmptyStrategy,
    #[error("strategy has {count} stints, at most {max} allowed")]
    TooManyStints { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
