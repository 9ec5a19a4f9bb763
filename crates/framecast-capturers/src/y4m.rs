use std::{fs::File, io::{BufReader, Read}, path::Path};

use async_trait::async_trait;
use image::RgbImage;
use log::{debug, info, warn};
use y4m::{Colorspace, Decoder};

use framecast_codecs::buffers::put_rgb_image;
use framecast_core::{
    common::helpers::time::now_timestamp, error::DropReason, traits::FrameProcessor,
    types::FrameData,
};

use crate::{yuv::yuv420_to_rgb, CapturerError};

/// Reads 8-bit 4:2:0 frames out of a YUV4MPEG2 stream and converts them to RGB.
pub struct Y4MFrameCapturer<R: Read> {
    stream: Decoder<R>,
    raw_buffer_id: String,

    width: usize,
    height: usize,

    captured_frames: u128,
}

impl Y4MFrameCapturer<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(raw_buffer_id: &str, path: P) -> Result<Self, CapturerError> {
        let file = File::open(path.as_ref())?;
        info!("Reading frames from {}", path.as_ref().display());
        Self::new(raw_buffer_id, BufReader::new(file))
    }
}

impl<R: Read> Y4MFrameCapturer<R> {
    pub fn new(raw_buffer_id: &str, reader: R) -> Result<Self, CapturerError> {
        let stream = y4m::decode(reader).map_err(CapturerError::Y4M)?;

        match stream.get_colorspace() {
            Colorspace::C420 | Colorspace::C420jpeg | Colorspace::C420paldv | Colorspace::C420mpeg2 => {}
            colorspace => return Err(CapturerError::UnsupportedColorspace(colorspace)),
        }

        let width = stream.get_width();
        let height = stream.get_height();
        debug!("Y4M stream of {}x{}", width, height);

        Ok(Self {
            stream,
            raw_buffer_id: raw_buffer_id.to_string(),
            width,
            height,
            captured_frames: 0,
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn capture(&mut self) -> Result<RgbImage, y4m::Error> {
        let frame = self.stream.read_frame()?;

        let mut image = RgbImage::new(self.width as u32, self.height as u32);
        yuv420_to_rgb(
            frame.get_y_plane(),
            frame.get_u_plane(),
            frame.get_v_plane(),
            self.width,
            self.height,
            &mut image,
        );

        Ok(image)
    }
}

#[async_trait]
impl<R: Read + Send> FrameProcessor for Y4MFrameCapturer<R> {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        match self.capture() {
            Ok(image) => {
                frame_data.set("capture_timestamp", now_timestamp());
                frame_data.set("frame_id", self.captured_frames);
                put_rgb_image(&mut frame_data, &self.raw_buffer_id, image);

                self.captured_frames += 1;
            }
            Err(y4m::Error::EOF) => {
                info!("No more frames to extract ({} captured)", self.captured_frames);
                frame_data.set_drop_reason(Some(DropReason::EndOfStream));
            }
            Err(error) => {
                warn!("Unreadable Y4M frame, stopping capture: {:?}", error);
                frame_data.set_drop_reason(Some(DropReason::EndOfStream));
            }
        }

        Some(frame_data)
    }
}
