use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    UnknownExercise(String),
    InvalidConfig(String),
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::UnknownExercise(id) => write!(f, "unknown exercise: {id}"),
            MotionError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for MotionError {}

pub type Result<T> = std::result::Result<T, MotionError>;
