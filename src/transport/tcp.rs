use log::warn;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::Envelope;
use crate::transport::Transport;

/// Default timeout for writes (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest accepted frame, newline excluded.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// One JSON envelope per line over TCP.
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    // Bytes of a frame not yet terminated; kept across cancelled reads.
    pending: Vec<u8>,
    timeout_duration: Duration,
}

fn io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_timeout(stream, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        let (read, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer,
            pending: Vec::new(),
            timeout_duration,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Read until the next complete line, or fail once the frame grows past
    /// [`MAX_FRAME_LEN`].
    async fn read_frame(&mut self) -> anyhow::Result<Vec<u8>> {
        loop {
            // One byte of headroom for the terminating newline.
            let limit = (MAX_FRAME_LEN + 1).saturating_sub(self.pending.len()) as u64;
            let read = (&mut self.reader)
                .take(limit)
                .read_until(b'\n', &mut self.pending)
                .await
                .map_err(io_error)?;

            if self.pending.last() == Some(&b'\n') {
                let mut frame = std::mem::take(&mut self.pending);
                frame.pop();
                return Ok(frame);
            }
            if self.pending.len() > MAX_FRAME_LEN {
                return Err(anyhow::anyhow!(
                    "Frame too large: more than {} bytes",
                    MAX_FRAME_LEN
                ));
            }
            if read == 0 {
                return Err(anyhow::anyhow!("Connection closed by peer"));
            }
        }
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, envelope: Envelope) -> anyhow::Result<()> {
        let mut line = envelope.to_json()?;
        line.push('\n');
        timeout(self.timeout_duration, self.writer.write_all(line.as_bytes()))
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.timeout_duration))?
            .map_err(io_error)
    }

    /// Next well-formed envelope. Blank and malformed lines are skipped.
    async fn recv(&mut self) -> anyhow::Result<Envelope> {
        loop {
            let frame = self.read_frame().await?;
            let text = String::from_utf8_lossy(&frame);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            match Envelope::parse(text) {
                Ok(envelope) => return Ok(envelope),
                Err(e) => warn!("skipping malformed frame: {}", e),
            }
        }
    }
}
