use thiserror::Error;

pub mod image_sequence;
pub mod y4m;
pub mod yuv;

#[derive(Error, Debug)]
pub enum CapturerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid Y4M stream: {0:?}")]
    Y4M(::y4m::Error),

    #[error("Unsupported Y4M colorspace {0:?}, only 8-bit 4:2:0 is handled")]
    UnsupportedColorspace(::y4m::Colorspace),

    #[error("No image files found in {0}")]
    EmptySequence(String),
}
