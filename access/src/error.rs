//! Access control error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccessError {
    #[error("unauthorized: {0} is not the owner")]
    Unauthorized(String),
}

pub type Result<T> = std::result::Result<T, AccessError>;
