use async_trait::async_trait;

use crate::types::FrameData;

/// A pipeline stage. Returning `None` consumes the frame; returning it with a drop
/// reason set hands the decision to whatever comes next (usually an `OnErrorSwitch`).
#[async_trait]
pub trait FrameProcessor {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData>;
}

#[async_trait]
impl<P: FrameProcessor + Send + ?Sized> FrameProcessor for Box<P> {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData> {
        (**self).process(frame_data).await
    }
}
