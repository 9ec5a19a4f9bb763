use async_trait::async_trait;

use framecast_core::{common::helpers::time::now_timestamp, traits::FrameProcessor, types::FrameData};

/// Stamps the current UNIX time, in milliseconds, into the `stat_key` stat. Pair it with
/// a [`super::diff::TimestampDiffCalculator`] further down to time a section of a pipeline.
pub struct TimestampAdder {
    stat_key: String,
}

impl TimestampAdder {
    pub fn new(stat_key: &str) -> Self {
        Self {
            stat_key: stat_key.to_string(),
        }
    }
}

#[async_trait]
impl FrameProcessor for TimestampAdder {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        frame_data.set(&self.stat_key, now_timestamp());
        Some(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use framecast_core::{common::helpers::time::now_timestamp, traits::FrameProcessor, types::FrameData};

    use super::TimestampAdder;

    #[tokio::test]
    async fn stamp_lies_between_surrounding_clock_reads() {
        let mut adder = TimestampAdder::new("capture_timestamp");

        let before = now_timestamp();
        let frame_data = adder.process(FrameData::default()).await.unwrap();
        let after = now_timestamp();

        let stamp = frame_data.get("capture_timestamp").unwrap();
        assert!(before <= stamp && stamp <= after);
    }

    #[tokio::test]
    async fn later_stamps_replace_earlier_ones() {
        let mut adder = TimestampAdder::new("capture_timestamp");

        let mut frame_data = FrameData::default();
        frame_data.set("capture_timestamp", 1);

        let frame_data = adder.process(frame_data).await.unwrap();
        assert!(frame_data.get("capture_timestamp").unwrap() > 1);
    }
}
