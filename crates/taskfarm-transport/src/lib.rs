mod mesh;

pub use mesh::ChannelMesh;

use async_trait::async_trait;
use bytes::Bytes;
use taskfarm_protocol::Tag;
use thiserror::Error;

/// Role identity within a run. Rank 0 is the coordinator by convention.
pub type Rank = usize;

/// Receive filter on the sending side of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Accept a message from any peer.
    Any,
    /// Accept only from the given rank.
    Rank(Rank),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Rank {rank} is out of range for world size {world_size}")]
    UnknownRank { rank: Rank, world_size: usize },

    #[error("Peer {0} disconnected")]
    Disconnected(Rank),

    #[error("Inbox closed: all peers disconnected")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Point-to-point message passing between roles, plus a collective
/// barrier. Message exchange is the sole coordination primitive: roles
/// share no mutable state and a transport failure is fatal to the run.
#[async_trait]
pub trait Transport: Send + Sync {
    /// This role's own rank.
    fn rank(&self) -> Rank;

    /// Total number of roles, coordinator included.
    fn world_size(&self) -> usize;

    /// Deliver `payload` to `dest` under `tag`. Reliable and ordered per
    /// sender/receiver pair.
    async fn send(&self, dest: Rank, tag: Tag, payload: Bytes) -> Result<()>;

    /// Block until a message matching `source` and `tag` arrives; returns
    /// the actual sender rank alongside the payload.
    async fn recv(&self, source: Source, tag: Tag) -> Result<(Rank, Bytes)>;

    /// Block until every role has reached the barrier.
    async fn barrier(&self) -> Result<()>;
}
