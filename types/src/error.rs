use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid content hash: {0}")]
    InvalidHash(String),
}
