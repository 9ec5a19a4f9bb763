use async_trait::async_trait;
use bytes::Bytes;
use image::{codecs::jpeg, ColorType, RgbImage};
use log::{debug, warn};

use framecast_core::{error::DropReason, traits::FrameProcessor, types::FrameData};

use crate::buffers::{put_rgb_image, take_rgb_image};

/// Compresses the raw RGB buffer into a JPEG at a fixed quality.
pub struct JpegEncoder {
    raw_buffer_id: String,
    encoded_buffer_id: String,
    quality: u8,
}

impl JpegEncoder {
    pub fn new(raw_buffer_id: &str, encoded_buffer_id: &str, quality: u8) -> Self {
        Self {
            raw_buffer_id: raw_buffer_id.to_string(),
            encoded_buffer_id: encoded_buffer_id.to_string(),
            quality: quality.clamp(1, 100),
        }
    }

    fn encode(&self, image: &RgbImage) -> image::ImageResult<Vec<u8>> {
        let mut encoded = Vec::new();
        jpeg::JpegEncoder::new_with_quality(&mut encoded, self.quality).encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgb8,
        )?;
        Ok(encoded)
    }
}

#[async_trait]
impl FrameProcessor for JpegEncoder {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        let image = match take_rgb_image(&mut frame_data, &self.raw_buffer_id) {
            Ok(image) => image,
            Err(reason) => {
                warn!("Unable to read raw frame: {}", reason);
                frame_data.set_drop_reason(Some(reason));
                return Some(frame_data);
            }
        };

        match self.encode(&image) {
            Ok(encoded) => {
                debug!("Encoded {}x{} frame into {} bytes", image.width(), image.height(), encoded.len());
                frame_data.set("encoded_size", encoded.len() as u128);
                frame_data.insert_readonly_buffer(&self.encoded_buffer_id, Bytes::from(encoded));
            }
            Err(error) => {
                warn!("Failed to encode frame: {}", error);
                frame_data.set_drop_reason(Some(DropReason::CodecError));
            }
        }

        put_rgb_image(&mut frame_data, &self.raw_buffer_id, image);

        Some(frame_data)
    }
}
