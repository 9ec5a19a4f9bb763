use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;

use crate::types::FrameData;

pub struct PipelineFeeder {
    sender: Option<UnboundedSender<FrameData>>
}

impl PipelineFeeder {
    pub fn new(sender: Option<UnboundedSender<FrameData>>) -> Self {
        Self {
            sender
        }
    }

    pub fn feed(&self, frame_data: FrameData) {
        match &self.sender {
            Some(sender) => {
                if sender.send(frame_data).is_err() {
                    warn!("Feeding channel closed, frame discarded");
                }
            }
            None => debug!("Pipeline is not feedable, frame discarded"),
        }
    }
}
