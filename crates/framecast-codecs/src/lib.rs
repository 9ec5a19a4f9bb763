pub mod buffers;
pub mod jpeg;

pub const DEFAULT_JPEG_QUALITY: u8 = 80;
