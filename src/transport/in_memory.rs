use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::protocol::Envelope;
use crate::transport::Transport;

/// One end of an in-process transport pair.
pub struct InMemoryTransport {
    outbound: UnboundedSender<Envelope>,
    inbound: UnboundedReceiver<Envelope>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        (
            Self {
                outbound: tx1,
                inbound: rx2,
            },
            Self {
                outbound: tx2,
                inbound: rx1,
            },
        )
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, envelope: Envelope) -> anyhow::Result<()> {
        self.outbound
            .send(envelope)
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn recv(&mut self) -> anyhow::Result<Envelope> {
        self.inbound
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Channel closed"))
    }
}
