use async_trait::async_trait;

use crate::{traits::FrameProcessor, types::FrameData};

type ProcessorFn = Box<dyn FnMut(FrameData) -> Option<FrameData> + Send>;

/// Wraps a closure as a pipeline stage. Returning `None` drops the frame silently.
pub struct Function {
    function: ProcessorFn,
}

impl Function {
    pub fn new<F>(function: F) -> Self
    where
        F: FnMut(FrameData) -> Option<FrameData> + Send + 'static,
    {
        Self {
            function: Box::new(function),
        }
    }
}

#[async_trait]
impl FrameProcessor for Function {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData> {
        (self.function)(frame_data)
    }
}
