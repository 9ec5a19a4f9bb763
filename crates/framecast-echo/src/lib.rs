//! Echo services: every message received is sent back to its sender unmodified.

pub mod tcp;
pub mod udp;

pub const DEFAULT_PORT: u16 = 12345;
pub const BUFFER_SIZE: usize = 1024;
