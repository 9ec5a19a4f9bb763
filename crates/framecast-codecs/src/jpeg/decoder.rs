use async_trait::async_trait;
use image::ImageFormat;
use log::{debug, warn};

use framecast_core::{error::DropReason, traits::FrameProcessor, types::FrameData};

use crate::buffers::put_rgb_image;

/// Decodes a JPEG payload into a raw RGB buffer. Undecodable payloads are logged and
/// the frame is marked as a codec error so that it can be skipped.
pub struct JpegDecoder {
    encoded_buffer_id: String,
    raw_buffer_id: String,
}

impl JpegDecoder {
    pub fn new(encoded_buffer_id: &str, raw_buffer_id: &str) -> Self {
        Self {
            encoded_buffer_id: encoded_buffer_id.to_string(),
            raw_buffer_id: raw_buffer_id.to_string(),
        }
    }
}

#[async_trait]
impl FrameProcessor for JpegDecoder {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        let encoded = match frame_data.extract_readonly_buffer(&self.encoded_buffer_id) {
            Some(encoded) => encoded,
            None => {
                frame_data.set_drop_reason(Some(DropReason::MissingBuffer));
                return Some(frame_data);
            }
        };

        match image::load_from_memory_with_format(&encoded, ImageFormat::Jpeg) {
            Ok(decoded) => {
                let decoded = decoded.to_rgb8();
                debug!("Decoded {}x{} frame", decoded.width(), decoded.height());
                put_rgb_image(&mut frame_data, &self.raw_buffer_id, decoded);
            }
            Err(error) => {
                warn!("Failed to decode frame: {}", error);
                frame_data.set_drop_reason(Some(DropReason::CodecError));
            }
        }

        Some(frame_data)
    }
}
