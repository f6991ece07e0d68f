use thiserror::Error;

/// Errors produced while parsing motion identifiers (eases, positions, edges).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("unknown ease `{0}`")]
    UnknownEase(String),
    #[error("invalid timeline position `{0}`")]
    InvalidPosition(String),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

pub type Result<T> = std::result::Result<T, MotionError>;
