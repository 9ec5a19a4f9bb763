use std::io;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::net::{TcpStream, ToSocketAddrs};

use framecast_core::{error::DropReason, traits::FrameProcessor, types::FrameData};

use crate::framing::{FrameWriter, FramingError, DEFAULT_MAX_FRAME_LENGTH};

/// Writes one buffer of each frame to an outbound TCP connection.
pub struct TcpFrameSender {
    buffer_id: String,
    writer: FrameWriter<TcpStream>,
}

impl TcpFrameSender {
    pub fn new(buffer_id: &str, stream: TcpStream) -> Self {
        Self::with_max_frame_length(buffer_id, stream, DEFAULT_MAX_FRAME_LENGTH)
    }

    pub fn with_max_frame_length(buffer_id: &str, stream: TcpStream, max_frame_length: usize) -> Self {
        Self {
            buffer_id: buffer_id.to_string(),
            writer: FrameWriter::with_max_frame_length(stream, max_frame_length),
        }
    }

    pub async fn connect<A: ToSocketAddrs>(buffer_id: &str, address: A) -> io::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        info!("Connected to {}", stream.peer_addr()?);
        stream.set_nodelay(true)?;

        Ok(Self::new(buffer_id, stream))
    }
}

#[async_trait]
impl FrameProcessor for TcpFrameSender {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        let buffer = match frame_data.get_readonly_buffer_ref(&self.buffer_id) {
            Some(buffer) => buffer.clone(),
            None => {
                warn!("Missing '{}' buffer, nothing to transmit", self.buffer_id);
                frame_data.set_drop_reason(Some(DropReason::MissingBuffer));
                return Some(frame_data);
            }
        };

        match self.writer.write_frame(&buffer).await {
            Ok(transmitted_bytes) => {
                debug!("Transmitted {} bytes", transmitted_bytes);
                frame_data.set("transmitted_bytes", transmitted_bytes as u128);
            }
            Err(FramingError::Io(error)) => {
                warn!("Connection lost while transmitting: {}", error);
                frame_data.set_drop_reason(Some(DropReason::ConnectionClosed));
            }
            Err(error) => {
                warn!("Frame not transmitted: {}", error);
                frame_data.set_drop_reason(Some(DropReason::OversizedFrame));
            }
        }

        Some(frame_data)
    }
}
