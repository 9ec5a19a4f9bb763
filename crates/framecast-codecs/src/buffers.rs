//! Raw frames travel as tightly packed RGB8 buffers, their size stored in the
//! `width` and `height` stats.

use bytes::BytesMut;
use image::RgbImage;

use framecast_core::{error::DropReason, types::FrameData};

pub fn take_rgb_image(frame_data: &mut FrameData, buffer_id: &str) -> Result<RgbImage, DropReason> {
    let (width, height) = frame_data.dimensions().ok_or(DropReason::MissingBuffer)?;

    let buffer = frame_data
        .extract_writable_buffer(buffer_id)
        .ok_or(DropReason::MissingBuffer)?;

    RgbImage::from_raw(width, height, buffer.to_vec()).ok_or(DropReason::CodecError)
}

pub fn put_rgb_image(frame_data: &mut FrameData, buffer_id: &str, image: RgbImage) {
    frame_data.set_dimensions(image.width(), image.height());
    frame_data.insert_writable_buffer(buffer_id, BytesMut::from(image.as_raw().as_slice()));
}
