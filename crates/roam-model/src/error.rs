use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
