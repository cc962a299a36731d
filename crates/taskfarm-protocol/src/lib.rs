mod message;

pub use message::{Assignment, AssignFrame, Completion, Tag};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid message tag: {0}")]
    InvalidTag(u8),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
