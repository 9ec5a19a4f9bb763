//! Optional analysis of received frames. A detector is anything able to turn an RGB
//! image into a list of labelled boxes; [`overlay::DetectionOverlay`] runs it inside
//! a pipeline, draws the boxes and appends them to a [`detection_log::DetectionLog`].

pub mod coco;
pub mod detector;
pub mod draw;
pub mod detection_log;
pub mod overlay;
pub mod yolo;

#[cfg(feature = "onnx")]
pub mod onnx;

pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;
