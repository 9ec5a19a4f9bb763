use std::path::Path;

use image::RgbImage;
use log::{debug, warn};
use ort::{session::Session, value::Tensor};

use crate::{
    coco::coco_labels,
    detector::{Detection, ObjectDetector},
    yolo::{decode, preprocess, INPUT_SIZE},
    DEFAULT_MIN_CONFIDENCE,
};

/// YOLOv8 detector running an exported ONNX model on the CPU.
pub struct YoloDetector {
    session: Session,
    labels: Vec<String>,
    min_confidence: f32,
}

impl YoloDetector {
    pub fn open<P: AsRef<Path>>(model_path: P) -> ort::Result<Self> {
        let session = Session::builder()?.with_intra_threads(1)?.commit_from_file(model_path)?;

        Ok(Self {
            session,
            labels: coco_labels(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        })
    }

    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    fn infer(&self, image: &RgbImage) -> ort::Result<Vec<Detection>> {
        let (input, letterbox) = preprocess(image);
        let size = INPUT_SIZE as usize;
        let tensor = Tensor::from_array(([1usize, 3, size, size], input))?;

        let outputs = self.session.run(ort::inputs![tensor]?)?;
        let (shape, output) = outputs[0].try_extract_raw_tensor::<f32>()?;
        let shape: Vec<usize> = shape.iter().map(|dimension| *dimension as usize).collect();

        Ok(decode(&shape, output, &letterbox, image.dimensions(), &self.labels, self.min_confidence))
    }
}

impl ObjectDetector for YoloDetector {
    fn detect(&mut self, image: &RgbImage) -> Vec<Detection> {
        if image.width() == 0 || image.height() == 0 {
            return Vec::new();
        }

        match self.infer(image) {
            Ok(detections) => {
                debug!("{} detections", detections.len());
                detections
            }
            Err(error) => {
                warn!("Inference failed: {}", error);
                Vec::new()
            }
        }
    }
}
