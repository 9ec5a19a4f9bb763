//! Input and output handling for YOLOv8-style detection models. The model sees a
//! letterboxed 640x640 RGB image as `[1, 3, 640, 640]` floats in `[0, 1]` and answers
//! with `[1, 4 + classes, anchors]`: box centre, size, then one score per class.

use image::{
    imageops::{self, FilterType},
    Rgb, RgbImage,
};

use crate::detector::Detection;

pub const INPUT_SIZE: u32 = 640;
pub const PADDING_COLOR: Rgb<u8> = Rgb([114, 114, 114]);
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.7;

/// How a source image was fitted into the square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub resized_width: u32,
    pub resized_height: u32,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl Letterbox {
    pub fn fit(width: u32, height: u32) -> Self {
        let scale = (INPUT_SIZE as f32 / width.max(1) as f32).min(INPUT_SIZE as f32 / height.max(1) as f32);

        let resized_width = ((width as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);
        let resized_height = ((height as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);

        Self {
            scale,
            resized_width,
            resized_height,
            pad_x: (INPUT_SIZE - resized_width) / 2,
            pad_y: (INPUT_SIZE - resized_height) / 2,
        }
    }

    fn to_source_x(&self, x: f32, source_width: u32) -> f32 {
        ((x - self.pad_x as f32) / self.scale).clamp(0.0, source_width as f32)
    }

    fn to_source_y(&self, y: f32, source_height: u32) -> f32 {
        ((y - self.pad_y as f32) / self.scale).clamp(0.0, source_height as f32)
    }
}

/// Model input for `image` in CHW order, along with the letterbox used.
pub fn preprocess(image: &RgbImage) -> (Vec<f32>, Letterbox) {
    let (width, height) = image.dimensions();
    let letterbox = Letterbox::fit(width, height);

    let resized = imageops::resize(image, letterbox.resized_width, letterbox.resized_height, FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(INPUT_SIZE, INPUT_SIZE, PADDING_COLOR);
    imageops::replace(&mut canvas, &resized, letterbox.pad_x as i64, letterbox.pad_y as i64);

    let plane = (INPUT_SIZE * INPUT_SIZE) as usize;
    let mut input = vec![0f32; 3 * plane];
    for (x, y, pixel) in canvas.enumerate_pixels() {
        let offset = (y * INPUT_SIZE + x) as usize;
        for channel in 0..3 {
            input[channel * plane + offset] = pixel[channel] as f32 / 255.0;
        }
    }

    (input, letterbox)
}

/// Turns raw model output into detections in source image coordinates, keeping the
/// best class of every anchor scoring at least `min_confidence`.
pub fn decode(
    shape: &[usize],
    output: &[f32],
    letterbox: &Letterbox,
    source_dimensions: (u32, u32),
    labels: &[String],
    min_confidence: f32,
) -> Vec<Detection> {
    let (attributes, anchors) = match shape {
        [1, attributes, anchors] | [attributes, anchors] => (*attributes, *anchors),
        _ => return Vec::new(),
    };

    if attributes <= 4 || output.len() < attributes * anchors {
        return Vec::new();
    }

    let (source_width, source_height) = source_dimensions;
    let mut candidates = Vec::new();

    for anchor in 0..anchors {
        let value = |attribute: usize| output[attribute * anchors + anchor];

        let (class, score) = (0..attributes - 4)
            .map(|class| (class, value(4 + class)))
            .fold((0, f32::MIN), |best, current| if current.1 > best.1 { current } else { best });

        if !(score >= min_confidence) {
            continue;
        }

        let (center_x, center_y, box_width, box_height) = (value(0), value(1), value(2), value(3));
        let left = letterbox.to_source_x(center_x - box_width / 2.0, source_width);
        let right = letterbox.to_source_x(center_x + box_width / 2.0, source_width);
        let top = letterbox.to_source_y(center_y - box_height / 2.0, source_height);
        let bottom = letterbox.to_source_y(center_y + box_height / 2.0, source_height);

        if !(right - left >= 1.0 && bottom - top >= 1.0) {
            continue;
        }

        candidates.push(Detection {
            x: left.round() as u32,
            y: top.round() as u32,
            width: (right - left).round() as u32,
            height: (bottom - top).round() as u32,
            label: labels.get(class).cloned().unwrap_or_else(|| format!("class {}", class)),
            confidence: score,
        });
    }

    non_max_suppression(candidates, DEFAULT_IOU_THRESHOLD)
}

/// Keeps the most confident box of every group of same-label boxes overlapping by more
/// than `iou_threshold`.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in detections {
        let overlaps = kept
            .iter()
            .any(|other| other.label == candidate.label && intersection_over_union(other, &candidate) > iou_threshold);

        if !overlaps {
            kept.push(candidate);
        }
    }

    kept
}

pub fn intersection_over_union(a: &Detection, b: &Detection) -> f32 {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = a.x.saturating_add(a.width).min(b.x.saturating_add(b.width));
    let bottom = a.y.saturating_add(a.height).min(b.y.saturating_add(b.height));

    if right <= left || bottom <= top {
        return 0.0;
    }

    let intersection = ((right - left) as u64 * (bottom - top) as u64) as f32;
    let union = (a.area() + b.area()) as f32 - intersection;

    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::{
        decode, intersection_over_union, non_max_suppression, preprocess, Letterbox, INPUT_SIZE, PADDING_COLOR,
    };
    use crate::detector::Detection;

    fn labels() -> Vec<String> {
        vec!["person".to_string(), "dog".to_string()]
    }

    fn boxed(x: u32, y: u32, size: u32, label: &str, confidence: f32) -> Detection {
        Detection { x, y, width: size, height: size, label: label.to_string(), confidence }
    }

    /// Output of a two-class model, laid out attribute-major.
    fn model_output(anchors: &[[f32; 6]]) -> (Vec<usize>, Vec<f32>) {
        let mut output = vec![0f32; 6 * anchors.len()];
        for (anchor, values) in anchors.iter().enumerate() {
            for (attribute, value) in values.iter().enumerate() {
                output[attribute * anchors.len() + anchor] = *value;
            }
        }
        (vec![1, 6, anchors.len()], output)
    }

    #[test]
    fn wide_images_are_padded_vertically() {
        let letterbox = Letterbox::fit(1280, 640);

        assert_eq!(letterbox.scale, 0.5);
        assert_eq!((letterbox.resized_width, letterbox.resized_height), (640, 320));
        assert_eq!((letterbox.pad_x, letterbox.pad_y), (0, 160));
    }

    #[test]
    fn input_is_chw_with_grey_padding() {
        let image = RgbImage::from_pixel(64, 32, Rgb([255, 0, 0]));
        let (input, letterbox) = preprocess(&image);

        let plane = (INPUT_SIZE * INPUT_SIZE) as usize;
        assert_eq!(input.len(), 3 * plane);

        let center = (INPUT_SIZE / 2 * INPUT_SIZE + INPUT_SIZE / 2) as usize;
        assert!(input[center] > 0.99);
        assert_eq!((input[plane + center], input[2 * plane + center]), (0.0, 0.0));

        assert_eq!(letterbox.pad_y, 160);
        let padding = PADDING_COLOR[0] as f32 / 255.0;
        assert_eq!(input[0], padding);
        assert_eq!(input[2 * plane], padding);
    }

    #[test]
    fn boxes_are_mapped_back_to_the_source_image() {
        // 1280x640 source, scale 0.5, 160 pixels of padding above
        let letterbox = Letterbox::fit(1280, 640);
        let (shape, output) = model_output(&[[320.0, 320.0, 100.0, 50.0, 0.1, 0.9]]);

        let detections = decode(&shape, &output, &letterbox, (1280, 640), &labels(), 0.5);

        assert_eq!(detections.len(), 1);
        let detection = &detections[0];
        assert_eq!((detection.x, detection.y, detection.width, detection.height), (540, 270, 200, 100));
        assert_eq!(detection.label, "dog");
        assert_eq!(detection.confidence, 0.9);
    }

    #[test]
    fn weak_anchors_and_malformed_outputs_are_ignored() {
        let letterbox = Letterbox::fit(640, 640);
        let (shape, output) = model_output(&[[100.0, 100.0, 20.0, 20.0, 0.3, 0.4]]);

        assert!(decode(&shape, &output, &letterbox, (640, 640), &labels(), 0.5).is_empty());
        assert!(decode(&[1, 6], &output, &letterbox, (640, 640), &labels(), 0.5).is_empty());
        assert!(decode(&[1, 6, 2], &output, &letterbox, (640, 640), &labels(), 0.5).is_empty());
    }

    #[test]
    fn unknown_classes_get_a_numbered_label() {
        let letterbox = Letterbox::fit(640, 640);
        let (shape, output) = model_output(&[[100.0, 100.0, 20.0, 20.0, 0.1, 0.8]]);

        let detections = decode(&shape, &output, &letterbox, (640, 640), &labels()[..1], 0.5);
        assert_eq!(detections[0].label, "class 1");
    }

    #[test]
    fn overlapping_boxes_of_one_label_collapse() {
        let detections = vec![
            boxed(10, 10, 100, "person", 0.6),
            boxed(12, 12, 100, "person", 0.9),
            boxed(12, 12, 100, "dog", 0.7),
            boxed(300, 300, 50, "person", 0.55),
        ];

        let kept = non_max_suppression(detections, 0.7);

        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].confidence, 0.9);
        assert!(kept.iter().any(|detection| detection.label == "dog"));
        assert!(kept.iter().any(|detection| detection.x == 300));
    }

    #[test]
    fn overlap_ratio() {
        let a = boxed(0, 0, 10, "person", 1.0);

        assert_eq!(intersection_over_union(&a, &a), 1.0);
        assert_eq!(intersection_over_union(&a, &boxed(20, 20, 10, "person", 1.0)), 0.0);
        assert_eq!(intersection_over_union(&a, &boxed(5, 0, 10, "person", 1.0)), 50.0 / 150.0);
    }
}
