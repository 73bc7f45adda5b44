use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FdError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FdError>;
