//! Two peers exchanging messages over TCP loopback
//!
//! A server task answers Ping with IsAlive and Data with a transformed
//! reply; the client drives one round of each.

use anyhow::{Context, Result};
use msgwire::{Connection, MessageType, OutboundMessage};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    info!("Server listening on {}", addr);

    let server = tokio::spawn(async move {
        let (stream, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);
        let mut conn = Connection::from_stream(stream);

        while let Some(mut message) = conn.recv().await? {
            match message.message_type() {
                MessageType::Ping => {
                    let mut reply = OutboundMessage::with_type(MessageType::IsAlive);
                    reply.write_bool(true)?;
                    conn.send(reply.finish()).await?;
                }
                MessageType::Data => {
                    let text = message.read_string()?;
                    let count = message.read_i32()?;
                    info!("Server got {:?} with count {}", text, count);

                    let mut reply = OutboundMessage::new();
                    reply.write_string(&text.to_uppercase())?;
                    reply.write_i32(count + 1)?;
                    conn.send(reply.finish()).await?;
                }
                other => info!("Server ignoring {:?} message", other),
            }
        }
        anyhow::Ok(())
    });

    let mut client = Connection::connect(addr)
        .await
        .context("Failed to connect to server")?;

    // Liveness check first
    let mut ping = OutboundMessage::with_type(MessageType::Ping);
    client.send(ping.finish()).await?;

    let mut reply = client.recv().await?.context("Server closed early")?;
    info!(
        "Liveness reply: {:?}, alive = {}",
        reply.message_type(),
        reply.read_bool()?
    );

    // One data round-trip
    let mut request = OutboundMessage::new();
    request.write_string("hello")?;
    request.write_i32(1)?;
    client.send(request.finish()).await?;

    let mut reply = client.recv().await?.context("Server closed early")?;
    println!("Client received: {} {}", reply.read_string()?, reply.read_i32()?);

    drop(client);
    server.await??;

    println!("Session completed");
    Ok(())
}
