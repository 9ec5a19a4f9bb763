use std::{fs::create_dir_all, io, path::PathBuf};

use async_trait::async_trait;
use image::ImageFormat;
use log::{debug, info, warn};

use framecast_codecs::buffers::{put_rgb_image, take_rgb_image};
use framecast_core::{traits::FrameProcessor, types::FrameData};

/// Writes every raw frame to `folder` as `frame_<id>.jpg`. Stands in for an on-screen
/// preview.
pub struct FrameDumper {
    raw_buffer_id: String,
    folder: PathBuf,

    dumped_frames: u128,
}

impl FrameDumper {
    pub fn new(raw_buffer_id: &str, folder: PathBuf) -> io::Result<Self> {
        create_dir_all(&folder)?;
        info!("Dumping frames into {}", folder.display());

        Ok(Self {
            raw_buffer_id: raw_buffer_id.to_string(),
            folder,
            dumped_frames: 0,
        })
    }

    pub fn dumped_frames(&self) -> u128 {
        self.dumped_frames
    }
}

#[async_trait]
impl FrameProcessor for FrameDumper {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        let image = match take_rgb_image(&mut frame_data, &self.raw_buffer_id) {
            Ok(image) => image,
            Err(reason) => {
                warn!("Nothing to dump: {}", reason);
                return Some(frame_data);
            }
        };

        let frame_id = frame_data.frame_id().unwrap_or(self.dumped_frames);
        let file_path = self.folder.join(format!("frame_{:06}.jpg", frame_id));

        match image.save_with_format(&file_path, ImageFormat::Jpeg) {
            Ok(()) => {
                debug!("Dumped {}", file_path.display());
                self.dumped_frames += 1;
            }
            Err(error) => warn!("Unable to dump {}: {}", file_path.display(), error),
        }

        put_rgb_image(&mut frame_data, &self.raw_buffer_id, image);

        Some(frame_data)
    }
}
