use async_trait::async_trait;
use log::debug;

use framecast_core::{common::helpers::time::now_timestamp, traits::FrameProcessor, types::FrameData};

pub struct TimestampDiffCalculator {
    source_id: String,
    diff_id: String,
}

impl TimestampDiffCalculator {
    pub fn new(source_id: &str, diff_id: &str) -> Self {
        Self { 
            source_id: source_id.to_string(), 
            diff_id: diff_id.to_string()
        }
    }
}

#[async_trait]
impl FrameProcessor for TimestampDiffCalculator {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        match frame_data.get(&self.source_id) {
            Some(source_timestamp) => {
                frame_data.set(&self.diff_id, now_timestamp().saturating_sub(source_timestamp));
            }
            None => debug!("Missing '{}' timestamp, '{}' not computed", self.source_id, self.diff_id),
        }

        Some(frame_data)
    }
}

#[cfg(test)]
mod tests {
    use framecast_core::{common::helpers::time::now_timestamp, traits::FrameProcessor, types::FrameData};

    use super::TimestampDiffCalculator;
    use crate::time::add::TimestampAdder;

    #[tokio::test]
    async fn diff_measures_time_since_the_source_stamp() {
        let mut adder = TimestampAdder::new("start");
        let mut diff = TimestampDiffCalculator::new("start", "elapsed");

        let mut frame_data = adder.process(FrameData::default()).await.unwrap();
        frame_data.set("start", now_timestamp() - 50);

        let frame_data = diff.process(frame_data).await.unwrap();
        assert!(frame_data.get("elapsed").unwrap() >= 50);
    }

    #[tokio::test]
    async fn missing_source_leaves_the_frame_untouched() {
        let mut diff = TimestampDiffCalculator::new("start", "elapsed");

        let frame_data = diff.process(FrameData::default()).await.unwrap();
        assert!(!frame_data.has("elapsed"));
    }
}
