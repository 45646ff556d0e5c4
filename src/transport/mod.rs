//! Message transports carrying protocol envelopes.

use crate::protocol::Envelope;

pub mod in_memory;
pub mod tcp;

pub use in_memory::InMemoryTransport;
pub use tcp::TcpTransport;

/// Bidirectional envelope stream. A `recv` error means the peer is gone.
#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, envelope: Envelope) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Envelope>;
}
