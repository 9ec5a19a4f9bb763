use log::{debug, info, warn};
use tokio::{
    task::JoinHandle, sync::mpsc::{UnboundedReceiver, UnboundedSender},
};

use crate::{traits::FrameProcessor, types::FrameData};

macro_rules! tagged {
    ($self:ident, $msg:tt) => {{
        &format!("[{}] {}", $self.tag.as_ref().unwrap_or(&"".to_string()), $msg)
    }}
}

pub struct Component {
    processors: Vec<Box<dyn FrameProcessor + Send>>,

    receiver: Option<UnboundedReceiver<FrameData>>,
    sender: Option<UnboundedSender<FrameData>>,

    tag: Option<String>
}

impl Component {
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            receiver: None,
            sender: None,
            tag: None
        }
    }

    pub fn singleton<T: 'static + FrameProcessor + Send>(processor: T) -> Self {
        Self::new().append(processor)
    }

    pub fn append<T: 'static + FrameProcessor + Send>(mut self, processor: T) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    //////////////////////
    // Internal methods //
    //////////////////////

    pub(crate) fn set_sender(&mut self, sender: UnboundedSender<FrameData>) {
        self.sender = Some(sender);
    }

    pub(crate) fn set_receiver(&mut self, receiver: UnboundedReceiver<FrameData>) {
        self.receiver = Some(receiver);
    }

    async fn run_processors(&mut self, frame_data: FrameData) -> Option<FrameData> {
        let mut frame_data = Some(frame_data);

        for processor in &mut self.processors {
            let current = frame_data.take()?;
            frame_data = processor.process(current).await;

            match &frame_data {
                Some(frame_data) if !frame_data.is_terminal() => {}
                _ => break,
            }
        }

        frame_data
    }

    pub(crate) fn launch(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let frame_data = match self.receiver.as_mut() {
                    Some(receiver) => match receiver.recv().await {
                        Some(frame_data) => frame_data,
                        None => {
                            debug!("{}", tagged!(self, "Receive channel closed"));
                            break;
                        }
                    },
                    None => {
                        debug!("No receiver registered, allocating an empty frame DTO");
                        FrameData::default()
                    }
                };

                debug!("Received frame data: {}", frame_data);

                // Terminal frames skip the processors and only travel downstream
                let frame_data = if frame_data.is_terminal() {
                    Some(frame_data)
                } else {
                    self.run_processors(frame_data).await
                };

                let frame_data = match frame_data {
                    Some(frame_data) => frame_data,
                    None => continue,
                };

                let terminal = frame_data.is_terminal();

                if let Some(sender) = self.sender.as_ref() {
                    debug!("Sending frame data: {}", frame_data);
                    if sender.send(frame_data).is_err() {
                        warn!("{}", tagged!(self, "Send channel closed"));
                        break;
                    }
                }

                if terminal {
                    info!("{}", tagged!(self, "Terminal frame observed, stopping"));
                    break;
                }
            }
        })
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new()
    }
}
