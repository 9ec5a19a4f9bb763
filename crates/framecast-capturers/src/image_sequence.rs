use std::{collections::VecDeque, fs, path::{Path, PathBuf}};

use async_trait::async_trait;
use log::{debug, info, warn};

use framecast_codecs::buffers::put_rgb_image;
use framecast_core::{
    common::helpers::time::now_timestamp, error::DropReason, traits::FrameProcessor,
    types::FrameData,
};

use crate::CapturerError;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Plays the image files of a folder, in lexical order, as a video.
pub struct ImageSequenceCapturer {
    paths: VecDeque<PathBuf>,
    raw_buffer_id: String,

    captured_frames: u128,
}

impl ImageSequenceCapturer {
    pub fn open<P: AsRef<Path>>(raw_buffer_id: &str, folder: P) -> Result<Self, CapturerError> {
        let folder = folder.as_ref();

        let mut paths = Vec::new();
        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if path.is_file() && is_image(&path) {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(CapturerError::EmptySequence(folder.display().to_string()));
        }

        paths.sort();
        info!("Playing {} images from {}", paths.len(), folder.display());

        Ok(Self {
            paths: paths.into(),
            raw_buffer_id: raw_buffer_id.to_string(),
            captured_frames: 0,
        })
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[async_trait]
impl FrameProcessor for ImageSequenceCapturer {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        let path = match self.paths.pop_front() {
            Some(path) => path,
            None => {
                info!("No more frames to extract ({} captured)", self.captured_frames);
                frame_data.set_drop_reason(Some(DropReason::EndOfStream));
                return Some(frame_data);
            }
        };

        match image::open(&path) {
            Ok(image) => {
                debug!("Captured {}", path.display());
                frame_data.set("capture_timestamp", now_timestamp());
                frame_data.set("frame_id", self.captured_frames);
                put_rgb_image(&mut frame_data, &self.raw_buffer_id, image.to_rgb8());

                self.captured_frames += 1;
            }
            Err(error) => {
                warn!("Unable to read {}: {}", path.display(), error);
                frame_data.set_drop_reason(Some(DropReason::CodecError));
            }
        }

        Some(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgb, RgbImage};

    use framecast_core::{error::DropReason, traits::FrameProcessor, types::FrameData};

    use super::ImageSequenceCapturer;
    use crate::CapturerError;

    #[tokio::test]
    async fn images_are_played_in_lexical_order() {
        let folder = tempfile::tempdir().unwrap();

        RgbImage::from_pixel(3, 2, Rgb([255, 0, 0])).save(folder.path().join("b.png")).unwrap();
        RgbImage::from_pixel(5, 4, Rgb([0, 0, 255])).save(folder.path().join("a.png")).unwrap();
        fs::write(folder.path().join("c.png"), b"broken").unwrap();
        fs::write(folder.path().join("notes.txt"), b"ignored").unwrap();

        let mut capturer = ImageSequenceCapturer::open("raw", folder.path()).unwrap();
        assert_eq!(capturer.remaining(), 3);

        let first = capturer.process(FrameData::default()).await.unwrap();
        assert_eq!((first.get("width"), first.get("height")), (Some(5), Some(4)));

        let second = capturer.process(FrameData::default()).await.unwrap();
        assert_eq!((second.get("width"), second.get("height")), (Some(3), Some(2)));
        assert_eq!(second.get("frame_id"), Some(1));

        let broken = capturer.process(FrameData::default()).await.unwrap();
        assert_eq!(broken.get_drop_reason(), Some(DropReason::CodecError));

        let end = capturer.process(FrameData::default()).await.unwrap();
        assert_eq!(end.get_drop_reason(), Some(DropReason::EndOfStream));
    }

    #[test]
    fn empty_folder_is_rejected() {
        let folder = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageSequenceCapturer::open("raw", folder.path()),
            Err(CapturerError::EmptySequence(_))
        ));
    }
}
