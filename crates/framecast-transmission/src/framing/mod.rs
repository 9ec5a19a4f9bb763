use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, warn};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};


pub const FRAME_HEADER_SIZE: usize = 4;
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 16 * 1024 * 1024;
pub const READ_CHUNK_SIZE: usize = 4096;

#[derive(Error, Debug)]
pub enum FramingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Frame of {length} bytes exceeds the limit of {max_length} bytes")]
    FrameTooLarge { length: usize, max_length: usize },
}

/// Appends the length prefix and the payload to `dst`.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<(), FramingError> {
    let length = u32::try_from(payload.len()).map_err(|_| FramingError::FrameTooLarge {
        length: payload.len(),
        max_length: u32::MAX as usize,
    })?;

    dst.reserve(FRAME_HEADER_SIZE + payload.len());
    dst.put_u32(length);
    dst.put_slice(payload);

    Ok(())
}

pub fn decode_header(header: [u8; FRAME_HEADER_SIZE]) -> usize {
    u32::from_be_bytes(header) as usize
}

/// Payload length announced by `header`, if it is exactly one header long.
fn length_prefix(header: &[u8]) -> Option<usize> {
    <[u8; FRAME_HEADER_SIZE]>::try_from(header).ok().map(decode_header)
}

fn check_length(length: usize, max_length: usize) -> Result<(), FramingError> {
    if length > max_length {
        return Err(FramingError::FrameTooLarge { length, max_length });
    }
    Ok(())
}

/// Push-based reassembly of a length-prefixed stream fed in arbitrary chunks.
pub struct FrameAccumulator {
    buffer: BytesMut,
    pending_length: Option<usize>,
    max_frame_length: usize,
}

impl FrameAccumulator {
    pub fn new() -> Self {
        Self::with_max_frame_length(DEFAULT_MAX_FRAME_LENGTH)
    }

    pub fn with_max_frame_length(max_frame_length: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            pending_length: None,
            max_frame_length,
        }
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Bytes buffered but not yet handed out.
    pub fn residual(&self) -> usize {
        self.buffer.len()
    }

    /// True when no frame is partially buffered.
    pub fn is_idle(&self) -> bool {
        self.pending_length.is_none() && self.buffer.is_empty()
    }

    pub fn take_exact(&mut self, count: usize) -> Option<Bytes> {
        if self.buffer.len() < count {
            return None;
        }

        Some(self.buffer.split_to(count).freeze())
    }

    pub fn next_frame(&mut self) -> Result<Option<Bytes>, FramingError> {
        let length = match self.pending_length {
            Some(length) => length,
            None => {
                let length = match self.take_exact(FRAME_HEADER_SIZE).as_deref().and_then(length_prefix) {
                    Some(length) => length,
                    None => return Ok(None),
                };

                check_length(length, self.max_frame_length)?;
                self.pending_length = Some(length);
                length
            }
        };

        let payload = self.take_exact(length);
        if payload.is_some() {
            self.pending_length = None;
        }

        Ok(payload)
    }
}

impl Default for FrameAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffered reader of length-prefixed frames.
pub struct FrameReader<R> {
    reader: R,
    accumulator: FrameAccumulator,
    chunk: Vec<u8>,
    max_frame_length: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_frame_length(reader, DEFAULT_MAX_FRAME_LENGTH)
    }

    pub fn with_max_frame_length(reader: R, max_frame_length: usize) -> Self {
        Self {
            reader,
            accumulator: FrameAccumulator::with_max_frame_length(max_frame_length),
            chunk: vec![0u8; READ_CHUNK_SIZE],
            max_frame_length,
        }
    }

    /// Reads one chunk from the stream, returning false on a zero-byte read.
    async fn fill(&mut self) -> io::Result<bool> {
        let read_bytes = self.reader.read(&mut self.chunk).await?;
        debug!("Received {} bytes", read_bytes);

        if read_bytes == 0 {
            return Ok(false);
        }

        self.accumulator.extend(&self.chunk[..read_bytes]);
        Ok(true)
    }

    /// Blocks until exactly `count` bytes are available. `None` means the peer closed
    /// the stream first.
    pub async fn read_exact_bytes(&mut self, count: usize) -> io::Result<Option<Bytes>> {
        loop {
            if let Some(bytes) = self.accumulator.take_exact(count) {
                return Ok(Some(bytes));
            }

            if !self.fill().await? {
                return Ok(None);
            }
        }
    }

    pub async fn read_frame(&mut self) -> Result<Option<Bytes>, FramingError> {
        let length = match self.read_exact_bytes(FRAME_HEADER_SIZE).await?.as_deref().and_then(length_prefix) {
            Some(length) => length,
            None => {
                if self.accumulator.residual() > 0 {
                    warn!(
                        "Stream closed inside a frame header ({} bytes discarded)",
                        self.accumulator.residual()
                    );
                }
                return Ok(None);
            }
        };

        check_length(length, self.max_frame_length)?;

        debug!("Receiving {} encoded frame bytes...", length);

        match self.read_exact_bytes(length).await? {
            Some(payload) => Ok(Some(payload)),
            None => {
                warn!(
                    "Stream closed after {} of {} frame bytes",
                    self.accumulator.residual(),
                    length
                );
                Ok(None)
            }
        }
    }

    pub fn residual(&self) -> usize {
        self.accumulator.residual()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

pub struct FrameWriter<W> {
    writer: W,
    buffer: BytesMut,
    max_frame_length: usize,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_max_frame_length(writer, DEFAULT_MAX_FRAME_LENGTH)
    }

    pub fn with_max_frame_length(writer: W, max_frame_length: usize) -> Self {
        Self {
            writer,
            buffer: BytesMut::new(),
            max_frame_length,
        }
    }

    /// Writes prefix and payload, returning the number of bytes put on the wire.
    pub async fn write_frame(&mut self, payload: &[u8]) -> Result<usize, FramingError> {
        check_length(payload.len(), self.max_frame_length)?;

        self.buffer.clear();
        encode_frame(payload, &mut self.buffer)?;

        self.writer.write_all(&self.buffer).await?;

        Ok(self.buffer.len())
    }

    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
