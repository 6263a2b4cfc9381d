use thiserror::Error;

pub type FramecacheResult<T, E = FramecacheError> = Result<T, E>;

#[derive(Debug, Error)]
pub enum FramecacheError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
