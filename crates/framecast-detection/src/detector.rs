use image::RgbImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,

    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

pub trait ObjectDetector {
    fn detect(&mut self, image: &RgbImage) -> Vec<Detection>;
}

impl<F> ObjectDetector for F
where
    F: FnMut(&RgbImage) -> Vec<Detection>,
{
    fn detect(&mut self, image: &RgbImage) -> Vec<Detection> {
        self(image)
    }
}
