use async_trait::async_trait;
use log::debug;

use crate::{pipeline::{Pipeline, feeder::PipelineFeeder}, traits::FrameProcessor, types::FrameData};

/// Diverts frames carrying a non-terminal drop reason to another pipeline. Terminal
/// frames keep flowing so that the components downstream can shut down.
pub struct OnErrorSwitch {
    feeder: PipelineFeeder
}

impl OnErrorSwitch {
    pub fn new(destination_pipeline: &Pipeline) -> Self {
        Self {
            feeder: destination_pipeline.get_feeder()
        }
    }
}

#[async_trait]
impl FrameProcessor for OnErrorSwitch {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData> {
        match frame_data.get_drop_reason() {
            Some(reason) if !reason.is_terminal() => {
                debug!("Feeding dropped frame ({})", reason);
                self.feeder.feed(frame_data);
                None
            }
            _ => Some(frame_data),
        }
    }
}
