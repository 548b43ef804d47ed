use anyhow::{Result, anyhow};
use futures::{SinkExt, StreamExt};
use log::debug;
use messages::{Request, Response};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

/// Client side of the protocol transport. Every message travels in its own
/// frame, prefixed with the length of the payload.
pub struct Connection {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
}

impl Connection {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            framed: Framed::new(stream, LengthDelimitedCodec::new()),
        })
    }

    /// Send one request and wait for its response
    pub async fn request(&mut self, request: &Request) -> Result<Response> {
        let bytes = messages::encode(request)?;
        debug!("Sending a {} bytes request", bytes.len());
        self.framed.send(tokio_util::bytes::Bytes::from(bytes)).await?;

        let frame = self
            .framed
            .next()
            .await
            .ok_or_else(|| anyhow!("Server closed the connection"))??;
        Ok(messages::decode(&frame)?)
    }
}
