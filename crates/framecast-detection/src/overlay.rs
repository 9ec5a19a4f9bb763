use async_trait::async_trait;
use image::Rgb;
use log::{debug, warn};

use framecast_codecs::buffers::{put_rgb_image, take_rgb_image};
use framecast_core::{traits::FrameProcessor, types::FrameData};

use crate::{
    detector::ObjectDetector,
    draw::{draw_caption, draw_detection, BOX_COLOR, BOX_THICKNESS},
    detection_log::DetectionLog,
    DEFAULT_MIN_CONFIDENCE,
};

pub struct DetectionOverlay {
    detector: Box<dyn ObjectDetector + Send>,
    raw_buffer_id: String,

    min_confidence: f32,
    color: Rgb<u8>,

    log: Option<DetectionLog>,
}

impl DetectionOverlay {
    pub fn new<D: ObjectDetector + Send + 'static>(raw_buffer_id: &str, detector: D) -> Self {
        Self {
            detector: Box::new(detector),
            raw_buffer_id: raw_buffer_id.to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            color: BOX_COLOR,
            log: None,
        }
    }

    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn color(mut self, color: Rgb<u8>) -> Self {
        self.color = color;
        self
    }

    pub fn log_to(mut self, log: DetectionLog) -> Self {
        self.log = Some(log);
        self
    }
}

#[async_trait]
impl FrameProcessor for DetectionOverlay {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        let mut image = match take_rgb_image(&mut frame_data, &self.raw_buffer_id) {
            Ok(image) => image,
            Err(reason) => {
                warn!("No frame to analyse: {}", reason);
                frame_data.set_drop_reason(Some(reason));
                return Some(frame_data);
            }
        };

        let detections: Vec<_> = self
            .detector
            .detect(&image)
            .into_iter()
            .filter(|detection| detection.confidence >= self.min_confidence)
            .collect();

        for detection in &detections {
            debug!("{} {:.2} at ({}, {})", detection.label, detection.confidence, detection.x, detection.y);
            draw_detection(&mut image, detection, self.color, BOX_THICKNESS);
            draw_caption(&mut image, detection, self.color, BOX_THICKNESS);
        }

        if let Some(log) = self.log.as_mut() {
            if let Err(error) = log.append(&detections) {
                warn!("Unable to log detections: {}", error);
            }
        }

        frame_data.set("detections_count", detections.len() as u128);
        put_rgb_image(&mut frame_data, &self.raw_buffer_id, image);

        Some(frame_data)
    }
}
