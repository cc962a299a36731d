use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    #[error("No constructor registered for task kind: {0}")]
    UnknownKind(String),

    #[error("Task kind {kind}: missing field {field}")]
    MissingField { kind: String, field: &'static str },

    #[error("Task kind {kind}: field {field} has the wrong type")]
    FieldType { kind: String, field: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
