use std::sync::Arc;

use anyhow::{Error, Result};
use futures::{SinkExt, StreamExt};
use log::{debug, error, info};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::Server;

/// Accepts clients over TCP and hands their requests to the shared
/// [`Server`].
pub struct Service {
    listener: TcpListener,
    server: Arc<Server>,
}

impl Service {
    pub fn new(listener: TcpListener, server: Arc<Server>) -> Self {
        Self { listener, server }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Cannot accept connection: {}", e);
                    return Err(Error::from(e));
                }
            };
            info!("Handling client {}", peer);

            let mut client_handler = ClientHandler {
                framed: Framed::new(stream, LengthDelimitedCodec::new()),
                server: Arc::clone(&self.server),
            };
            tokio::spawn(async move {
                match client_handler.handle_client().await {
                    Ok(()) => info!("Closing connection with client {}", peer),
                    Err(error) => error!("Error while handling client {}: {}", peer, error),
                }
            });
        }
    }
}

struct ClientHandler {
    framed: Framed<TcpStream, LengthDelimitedCodec>,
    server: Arc<Server>,
}

impl ClientHandler {
    /// One response frame per request frame, until the client hangs up
    async fn handle_client(&mut self) -> Result<()> {
        while let Some(frame) = self.framed.next().await {
            let frame = frame?;
            debug!("Received a {} bytes request", frame.len());

            // Pairings and discrete logarithms would stall the reactor
            let server = Arc::clone(&self.server);
            let response =
                tokio::task::spawn_blocking(move || server.handle_frame(&frame)).await?;

            let bytes = messages::encode(&response)?;
            self.framed.send(tokio_util::bytes::Bytes::from(bytes)).await?;
        }
        Ok(())
    }
}
