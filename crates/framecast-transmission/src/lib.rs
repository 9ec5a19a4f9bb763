//! Frame transport over a byte stream. Every frame travels as a 4-byte big-endian
//! length followed by exactly that many payload bytes; there is no handshake, no
//! versioning and no resumption.

pub mod framing;

pub mod receiver;
pub mod sender;

pub const ENCODED_FRAME_BUFFER: &str = "encoded_frame_buffer";

pub const DEFAULT_PORT: u16 = 5000;

#[cfg(test)]
mod tests;
