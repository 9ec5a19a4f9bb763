use std::{io, net::SocketAddr};

use log::info;
use tokio::net::{lookup_host, ToSocketAddrs, UdpSocket};

use crate::BUFFER_SIZE;

/// Answers each datagram with a copy of itself.
pub struct UdpEchoServer {
    socket: UdpSocket,
}

impl UdpEchoServer {
    pub async fn bind<A: ToSocketAddrs>(address: A) -> io::Result<Self> {
        let socket = UdpSocket::bind(address).await?;
        info!("Echo server listening on {}", socket.local_addr()?);

        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn serve(&self) -> io::Result<()> {
        let mut buffer = [0u8; BUFFER_SIZE];

        loop {
            self.serve_once(&mut buffer).await?;
        }
    }

    async fn serve_once(&self, buffer: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let (read_bytes, peer_address) = self.socket.recv_from(buffer).await?;
        info!("Received from {} {}", peer_address, String::from_utf8_lossy(&buffer[..read_bytes]));

        self.socket.send_to(&buffer[..read_bytes], peer_address).await?;
        Ok((read_bytes, peer_address))
    }
}

pub struct UdpEchoClient {
    socket: UdpSocket,
    server_address: SocketAddr,
}

impl UdpEchoClient {
    pub async fn new<A: ToSocketAddrs>(server_address: A) -> io::Result<Self> {
        let server_address = lookup_host(server_address).await?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "server address did not resolve")
        })?;

        let local_address = if server_address.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local_address).await?;

        Ok(Self { socket, server_address })
    }

    /// Sends one datagram and waits for the reply datagram.
    pub async fn echo(&self, message: &[u8]) -> io::Result<(Vec<u8>, SocketAddr)> {
        self.socket.send_to(message, self.server_address).await?;

        let mut buffer = [0u8; BUFFER_SIZE];
        let (read_bytes, peer_address) = self.socket.recv_from(&mut buffer).await?;

        Ok((buffer[..read_bytes].to_vec(), peer_address))
    }
}
