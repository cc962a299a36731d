use taskfarm_core::TaskError;
use taskfarm_protocol::ProtocolError;
use taskfarm_transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Degenerate topology: parallel phase needs at least 2 roles, got {0}")]
    DegenerateTopology(usize),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Worker role failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RunError>;
