mod decoder;
mod encoder;

pub use decoder::JpegDecoder;
pub use encoder::JpegEncoder;
