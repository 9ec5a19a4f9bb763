use log::{info, warn};
use tokio::{sync::mpsc::{self, UnboundedSender}, task::JoinHandle};

use crate::types::FrameData;

use self::{component::Component, feeder::PipelineFeeder};

pub mod component;
pub mod feeder;

#[cfg(test)]
mod tests;

/// A chain of [`Component`]s, each running on its own task and handing frames to the
/// next one through an unbounded channel.
pub struct Pipeline {
    components: Vec<Component>,
    feeding_sender: Option<UnboundedSender<FrameData>>,

    tag: String,

    bound: bool
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            feeding_sender: None,

            tag: "".to_string(),

            bound: false
        }
    }

    pub fn singleton(component: Component) -> Self {
        Self::new().link(component)
    }

    pub fn link(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn get_feeder(&self) -> PipelineFeeder {
        PipelineFeeder::new(self.feeding_sender.clone())
    }

    pub fn run(mut self) -> Vec<JoinHandle<()>> {
        if !self.bound {
            self = self.bind();
        }

        info!("[{}] Launching {} components...", self.tag, self.components.len());

        self.components
            .into_iter()
            .map(|component| component.launch())
            .collect()
    }

    pub fn bind(mut self) -> Self {
        info!("[{}] Binding channels...", self.tag);

        for i in 1..self.components.len() {
            let (sender, receiver) = mpsc::unbounded_channel::<FrameData>();

            self.components[i - 1].set_sender(sender);
            self.components[i].set_receiver(receiver);
        }

        self.bound = true;

        self
    }

    pub fn feedable(mut self) -> Self {
        match self.components.first_mut() {
            Some(head) => {
                let (sender, receiver) = mpsc::unbounded_channel::<FrameData>();
                self.feeding_sender = Some(sender);

                head.set_receiver(receiver);
            }
            None => warn!("[{}] Cannot make an empty pipeline feedable", self.tag),
        }

        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
