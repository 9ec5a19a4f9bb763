use std::io;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use framecast_core::{error::DropReason, traits::FrameProcessor, types::FrameData};

use crate::framing::{FrameReader, FramingError, DEFAULT_MAX_FRAME_LENGTH};

/// Reads one length-prefixed frame per call from a single inbound TCP connection.
pub struct TcpFrameReceiver {
    buffer_id: String,
    reader: FrameReader<TcpStream>,

    received_frames: u128,
}

impl TcpFrameReceiver {
    pub fn new(buffer_id: &str, stream: TcpStream) -> Self {
        Self::with_max_frame_length(buffer_id, stream, DEFAULT_MAX_FRAME_LENGTH)
    }

    pub fn with_max_frame_length(buffer_id: &str, stream: TcpStream, max_frame_length: usize) -> Self {
        Self {
            buffer_id: buffer_id.to_string(),
            reader: FrameReader::with_max_frame_length(stream, max_frame_length),
            received_frames: 0,
        }
    }

    /// Binds `address` and waits for exactly one peer.
    pub async fn listen<A: ToSocketAddrs>(buffer_id: &str, address: A) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        info!("Listening on {}...", listener.local_addr()?);

        Self::accept(buffer_id, &listener).await
    }

    pub async fn accept(buffer_id: &str, listener: &TcpListener) -> io::Result<Self> {
        let (stream, peer_address) = listener.accept().await?;
        info!("Connected by {}", peer_address);

        Ok(Self::new(buffer_id, stream))
    }

    pub fn received_frames(&self) -> u128 {
        self.received_frames
    }
}

#[async_trait]
impl FrameProcessor for TcpFrameReceiver {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        match self.reader.read_frame().await {
            Ok(Some(payload)) => {
                debug!("Received frame #{} ({} bytes)", self.received_frames, payload.len());

                frame_data.set("frame_id", self.received_frames);
                frame_data.set("received_bytes", payload.len() as u128);
                frame_data.insert_readonly_buffer(&self.buffer_id, payload);

                self.received_frames += 1;
            }
            Ok(None) => {
                info!("Connection closed after {} frames", self.received_frames);
                frame_data.set_drop_reason(Some(DropReason::EndOfStream));
            }
            Err(FramingError::Io(error)) => {
                warn!("Connection error: {}", error);
                frame_data.set_drop_reason(Some(DropReason::ConnectionClosed));
            }
            Err(error) => {
                warn!("Protocol error: {}", error);
                frame_data.set_drop_reason(Some(DropReason::ProtocolError));
            }
        }

        Some(frame_data)
    }
}
