use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    error::DropReason,
    pipeline::{component::Component, Pipeline},
    processors::{error_switch::OnErrorSwitch, functional::Function},
    traits::FrameProcessor,
    types::FrameData,
};

struct CountingSource {
    next_id: u128,
    frames_count: u128,
}

#[async_trait]
impl FrameProcessor for CountingSource {
    async fn process(&mut self, mut frame_data: FrameData) -> Option<FrameData> {
        if self.next_id == self.frames_count {
            frame_data.set_drop_reason(Some(DropReason::EndOfStream));
        } else {
            frame_data.set("frame_id", self.next_id);
            self.next_id += 1;
        }

        Some(frame_data)
    }
}

struct Collector {
    sender: UnboundedSender<u128>,
}

#[async_trait]
impl FrameProcessor for Collector {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData> {
        if let Some(frame_id) = frame_data.get("frame_id") {
            let _ = self.sender.send(frame_id);
        }
        Some(frame_data)
    }
}

fn mark_odd_frames(mut frame_data: FrameData) -> Option<FrameData> {
    if frame_data.get("frame_id").unwrap_or_default() % 2 == 1 {
        frame_data.set_drop_reason(Some(DropReason::CodecError));
    }
    Some(frame_data)
}

#[tokio::test]
async fn terminal_frame_stops_every_component() {
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let pipeline = Pipeline::new()
        .tag("Test")
        .link(Component::singleton(CountingSource { next_id: 0, frames_count: 3 }))
        .link(Component::new().append(Function::new(Some)))
        .link(Component::singleton(Collector { sender }));

    futures::future::join_all(pipeline.run()).await;

    let mut collected = Vec::new();
    while let Some(frame_id) = receiver.recv().await {
        collected.push(frame_id);
    }

    assert_eq!(collected, vec![0, 1, 2]);
}

#[tokio::test]
async fn dropped_frames_are_diverted_to_the_error_pipeline() {
    let (main_sender, mut main_receiver) = mpsc::unbounded_channel();
    let (error_sender, mut error_receiver) = mpsc::unbounded_channel();

    let error_pipeline = Pipeline::singleton(Component::singleton(Collector { sender: error_sender }))
        .tag("Errors")
        .feedable();

    let main_pipeline = Pipeline::new()
        .tag("Main")
        .link(
            Component::new()
                .append(CountingSource { next_id: 0, frames_count: 6 })
                .append(Function::new(mark_odd_frames))
                .append(OnErrorSwitch::new(&error_pipeline)),
        )
        .link(Component::singleton(Collector { sender: main_sender }));

    let mut handles = error_pipeline.run();
    handles.extend(main_pipeline.run());
    futures::future::join_all(handles).await;

    let mut main_ids = Vec::new();
    while let Some(frame_id) = main_receiver.recv().await {
        main_ids.push(frame_id);
    }

    let mut error_ids = Vec::new();
    while let Some(frame_id) = error_receiver.recv().await {
        error_ids.push(frame_id);
    }

    assert_eq!(main_ids, vec![0, 2, 4]);
    assert_eq!(error_ids, vec![1, 3, 5]);
}

#[test]
fn terminal_reasons() {
    assert!(DropReason::EndOfStream.is_terminal());
    assert!(DropReason::ConnectionClosed.is_terminal());
    assert!(DropReason::ProtocolError.is_terminal());
    assert!(!DropReason::CodecError.is_terminal());
    assert!(!FrameData::default().is_terminal());
}
