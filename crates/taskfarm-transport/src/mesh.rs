use crate::{Rank, Result, Source, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use taskfarm_protocol::Tag;
use tokio::sync::{mpsc, Barrier, Mutex as AsyncMutex};

#[derive(Debug, Clone)]
struct Frame {
    source: Rank,
    tag: Tag,
    payload: Bytes,
}

impl Frame {
    fn matches(&self, source: Source, tag: Tag) -> bool {
        if self.tag != tag {
            return false;
        }
        match source {
            Source::Any => true,
            Source::Rank(rank) => self.source == rank,
        }
    }
}

/// In-process transport endpoint: one inbox per rank, a sender handle to
/// every peer, and a shared barrier. Frames that arrive while a filtered
/// receive is pending are stashed and handed out by a later matching
/// receive, so a ranked receive never drops traffic from other peers.
pub struct ChannelMesh {
    rank: Rank,
    world_size: usize,
    peers: Vec<mpsc::UnboundedSender<Frame>>,
    inbox: AsyncMutex<mpsc::UnboundedReceiver<Frame>>,
    stash: Mutex<VecDeque<Frame>>,
    barrier: Arc<Barrier>,
}

impl ChannelMesh {
    /// Build a fully connected mesh of `world_size` endpoints. Endpoint
    /// `i` in the returned vec is the transport for rank `i`.
    pub fn create(world_size: usize) -> Vec<ChannelMesh> {
        assert!(world_size > 0, "world size must be at least 1");

        let mut senders = Vec::with_capacity(world_size);
        let mut receivers = Vec::with_capacity(world_size);
        for _ in 0..world_size {
            let (tx, rx) = mpsc::unbounded_channel();
            senders.push(tx);
            receivers.push(rx);
        }

        let barrier = Arc::new(Barrier::new(world_size));

        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, rx)| ChannelMesh {
                rank,
                world_size,
                peers: senders.clone(),
                inbox: AsyncMutex::new(rx),
                stash: Mutex::new(VecDeque::new()),
                barrier: barrier.clone(),
            })
            .collect()
    }

    fn take_stashed(&self, source: Source, tag: Tag) -> Option<Frame> {
        let mut stash = self.stash.lock();
        let pos = stash.iter().position(|f| f.matches(source, tag))?;
        stash.remove(pos)
    }
}

#[async_trait]
impl Transport for ChannelMesh {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn world_size(&self) -> usize {
        self.world_size
    }

    async fn send(&self, dest: Rank, tag: Tag, payload: Bytes) -> Result<()> {
        let sender = self.peers.get(dest).ok_or(TransportError::UnknownRank {
            rank: dest,
            world_size: self.world_size,
        })?;

        sender
            .send(Frame {
                source: self.rank,
                tag,
                payload,
            })
            .map_err(|_| TransportError::Disconnected(dest))
    }

    async fn recv(&self, source: Source, tag: Tag) -> Result<(Rank, Bytes)> {
        if let Some(frame) = self.take_stashed(source, tag) {
            return Ok((frame.source, frame.payload));
        }

        let mut inbox = self.inbox.lock().await;
        loop {
            let frame = inbox.recv().await.ok_or(TransportError::Closed)?;
            if frame.matches(source, tag) {
                return Ok((frame.source, frame.payload));
            }
            self.stash.lock().push_back(frame);
        }
    }

    async fn barrier(&self) -> Result<()> {
        self.barrier.wait().await;
        Ok(())
    }
}
