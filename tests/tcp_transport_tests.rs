use std::sync::Arc;

use fleet_arena::config::EngineConfig;
use fleet_arena::protocol::{Envelope, Incoming, Outgoing, RegRequest};
use fleet_arena::transport::tcp::MAX_FRAME_LEN;
use fleet_arena::transport::{TcpTransport, Transport};
use fleet_arena::GameServer;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

fn reg(name: &str) -> Envelope {
    Incoming::Reg(RegRequest {
        name: name.into(),
        password: "pw".into(),
    })
    .to_envelope()
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn envelopes_round_trip_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut transport = TcpTransport::new(socket);
        let received = transport.recv().await.unwrap();
        transport.send(received.clone()).await.unwrap();
        received
    });

    let mut client = TcpTransport::connect(addr).await?;
    client.send(reg("alice")).await?;
    let echoed = client.recv().await?;
    assert_eq!(echoed, reg("alice"));
    assert_eq!(server.await?, reg("alice"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_lines_are_skipped() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let client = tokio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut payload = b"this is not json\n\n{\"type\":\n".to_vec();
        payload.extend_from_slice(reg("bob").to_json().unwrap().as_bytes());
        payload.push(b'\n');
        stream.write_all(&payload).await.unwrap();
        stream
    });

    let (socket, _) = listener.accept().await?;
    let mut transport = TcpTransport::new(socket);
    assert_eq!(transport.recv().await?, reg("bob"));
    drop(client.await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_frame_is_fatal() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let client = tokio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let junk = vec![b'a'; MAX_FRAME_LEN + 16];
        let _ = stream.write_all(&junk).await;
        stream
    });

    let (socket, _) = listener.accept().await?;
    let mut transport = TcpTransport::new(socket);
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("Frame too large"));
    drop(client.await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_peer_ends_recv() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let client = tokio::spawn(async move {
        let stream = TcpStream::connect(addr).await.unwrap();
        drop(stream);
    });

    let (socket, _) = listener.accept().await?;
    client.await?;
    let mut transport = TcpTransport::new(socket);
    assert!(transport.recv().await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn server_registers_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = Arc::new(GameServer::new(EngineConfig::default()));
    tokio::spawn(server.serve(listener));

    let mut client = TcpTransport::connect(addr).await?;
    client.send(reg("carol")).await?;
    let Outgoing::Reg(reply) = Outgoing::from_envelope(&client.recv().await?)? else {
        panic!("expected reg reply");
    };
    assert_eq!(reply.name, "carol");
    assert!(!reply.error);
    assert_eq!(
        Outgoing::from_envelope(&client.recv().await?)?,
        Outgoing::UpdateRoom(vec![])
    );
    Ok(())
}
