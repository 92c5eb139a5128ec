//! Message-oriented connection over an async byte stream
//!
//! [`Connection`] pairs any `AsyncRead + AsyncWrite` stream with the frame
//! codec, turning it into a send/receive channel for finished messages. TCP
//! is the production transport; tests drive the same type over in-memory
//! streams.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::Framed;
use tracing::{debug, instrument};

use msgwire_core::InboundMessage;

use crate::codec::MessageCodec;
use crate::error::Result;

/// A framed, message-oriented view of a byte stream
pub struct Connection<S> {
    framed: Framed<S, MessageCodec>,
}

impl Connection<TcpStream> {
    /// Connect to a remote peer over TCP with the default codec
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        debug!("Connected to {}", stream.peer_addr()?);
        Ok(Self::from_stream(stream))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wrap an established stream with the default codec
    pub fn from_stream(stream: S) -> Self {
        Self::with_codec(stream, MessageCodec::new())
    }

    /// Wrap an established stream with an explicit codec
    pub fn with_codec(stream: S, codec: MessageCodec) -> Self {
        Self {
            framed: Framed::new(stream, codec),
        }
    }

    /// Send one finished message and flush it
    #[instrument(skip(self, message))]
    pub async fn send(&mut self, message: Bytes) -> Result<()> {
        debug!("Sending {} byte frame", message.len());
        self.framed.send(message).await
    }

    /// Receive the next complete message
    ///
    /// Returns `Ok(None)` when the peer closes the stream between frames.
    /// A close in the middle of a frame is an error.
    #[instrument(skip(self))]
    pub async fn recv(&mut self) -> Result<Option<InboundMessage>> {
        match self.framed.next().await {
            Some(Ok(message)) => {
                debug!(
                    "Received {:?} message with {} byte payload",
                    message.message_type(),
                    message.remaining()
                );
                Ok(Some(message))
            }
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    /// Access the underlying stream
    pub fn get_ref(&self) -> &S {
        self.framed.get_ref()
    }

    /// Consume the connection, returning the underlying stream
    pub fn into_inner(self) -> S {
        self.framed.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use chrono::{TimeZone, Utc};
    use msgwire_core::{MessageType, OutboundMessage};
    use tokio::io::AsyncWriteExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_send_recv_roundtrip() {
        let (client, server) = tokio::io::duplex(1024);
        let mut client = Connection::from_stream(client);
        let mut server = Connection::from_stream(server);

        let id = Uuid::from_bytes([7; 16]);
        let stamp = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();

        let mut message = OutboundMessage::with_type(MessageType::Verification);
        message.write_uuid(id).unwrap();
        message.write_datetime(stamp).unwrap();
        message.write_string("token").unwrap();
        client.send(message.finish()).await.unwrap();

        let mut received = server.recv().await.unwrap().unwrap();
        assert_eq!(received.message_type(), MessageType::Verification);
        assert_eq!(received.read_uuid().unwrap(), id);
        assert_eq!(received.read_datetime().unwrap(), stamp);
        assert_eq!(received.read_string().unwrap(), "token");
        assert_eq!(received.remaining(), 0);
    }

    #[tokio::test]
    async fn test_recv_reassembles_fragmented_stream() {
        let mut message = OutboundMessage::new();
        message.write_i32(-5).unwrap();
        message.write_u16(33).unwrap();
        let bytes = message.finish();

        // deliver the frame in three arbitrary chunks
        let stream = tokio_test::io::Builder::new()
            .read(&bytes[..2])
            .read(&bytes[2..7])
            .read(&bytes[7..])
            .build();

        let mut conn = Connection::from_stream(stream);
        let mut received = conn.recv().await.unwrap().unwrap();
        assert_eq!(received.read_i32().unwrap(), -5);
        assert_eq!(received.read_u16().unwrap(), 33);

        assert!(conn.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clean_close_yields_none() {
        let (client, server) = tokio::io::duplex(64);
        let mut server = Connection::from_stream(server);
        drop(client);

        assert!(server.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_mid_frame_is_an_error() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut server = Connection::from_stream(server);

        // header declares 10 payload bytes, only 2 arrive
        client.write_all(&[1, 10, 0, 0, 0, 0xaa, 0xbb]).await.unwrap();
        drop(client);

        let err = server.recv().await.unwrap_err();
        assert!(matches!(err, NetworkError::ConnectionClosed(7)));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_payload_limit_applies_per_connection() {
        let (client, server) = tokio::io::duplex(256);
        let mut client = Connection::from_stream(client);
        let mut server = Connection::with_codec(server, MessageCodec::with_max_payload_len(8));

        let mut message = OutboundMessage::new();
        message.write_bytes(&[0u8; 32]).unwrap();
        client.send(message.finish()).await.unwrap();

        let err = server.recv().await.unwrap_err();
        assert!(matches!(
            err,
            NetworkError::PayloadTooLarge { length: 32, max: 8 }
        ));
        assert!(logs_contain("exceeds limit"));
    }
}
