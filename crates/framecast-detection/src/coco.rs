/// Class names of the COCO dataset, in the order detection models trained on it use.
pub const COCO_LABELS: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat",
    "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack",
    "umbrella", "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball",
    "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple",
    "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair",
    "couch", "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink",
    "refrigerator", "book", "clock", "vase", "scissors", "teddy bear", "hair drier",
    "toothbrush",
];

pub fn coco_labels() -> Vec<String> {
    COCO_LABELS.iter().map(|label| label.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::coco_labels;

    #[test]
    fn labels_follow_the_coco_class_order() {
        let labels = coco_labels();

        assert_eq!(labels.len(), 80);
        assert_eq!(labels[0], "person");
        assert_eq!(labels[16], "dog");
        assert_eq!(labels[79], "toothbrush");
    }
}
