use std::{io, net::SocketAddr};

use log::{debug, info, warn};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream, ToSocketAddrs},
};

use crate::BUFFER_SIZE;

/// Serves one connection at a time, echoing each read back until the peer closes.
pub struct TcpEchoServer {
    listener: TcpListener,
}

impl TcpEchoServer {
    pub async fn bind<A: ToSocketAddrs>(address: A) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        info!("Echo server listening on {}", listener.local_addr()?);

        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn serve(&self) -> io::Result<()> {
        loop {
            let (stream, peer_address) = self.listener.accept().await?;
            info!("Connected by {}", peer_address);

            match serve_connection(stream, peer_address).await {
                Ok(echoed_bytes) => info!("{} disconnected after {} bytes", peer_address, echoed_bytes),
                Err(error) => warn!("Connection with {} failed: {}", peer_address, error),
            }
        }
    }
}

pub async fn serve_connection(mut stream: TcpStream, peer_address: SocketAddr) -> io::Result<u64> {
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut echoed_bytes = 0;

    loop {
        let read_bytes = stream.read(&mut buffer).await?;
        if read_bytes == 0 {
            return Ok(echoed_bytes);
        }

        info!("Received from {} {}", peer_address, String::from_utf8_lossy(&buffer[..read_bytes]));

        stream.write_all(&buffer[..read_bytes]).await?;
        echoed_bytes += read_bytes as u64;
    }
}

pub struct TcpEchoClient {
    stream: TcpStream,
}

impl TcpEchoClient {
    pub async fn connect<A: ToSocketAddrs>(address: A) -> io::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        info!("Connected to {}", stream.peer_addr()?);

        Ok(Self { stream })
    }

    /// Sends `message` and collects as many bytes as were sent. An empty message is not
    /// sent at all. Fails with `UnexpectedEof` if the server closes the connection first.
    pub async fn echo(&mut self, message: &[u8]) -> io::Result<Vec<u8>> {
        if message.is_empty() {
            return Ok(Vec::new());
        }

        self.stream.write_all(message).await?;

        let mut reply = Vec::with_capacity(message.len());
        let mut buffer = [0u8; BUFFER_SIZE];

        while reply.len() < message.len() {
            let wanted = (message.len() - reply.len()).min(BUFFER_SIZE);
            let read_bytes = self.stream.read(&mut buffer[..wanted]).await?;
            if read_bytes == 0 {
                debug!("Server closed the connection after {} of {} bytes", reply.len(), message.len());
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "server closed the connection"));
            }
            reply.extend_from_slice(&buffer[..read_bytes]);
        }

        Ok(reply)
    }

    pub async fn close(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
