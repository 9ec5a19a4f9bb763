use bytes::Bytes;
use tokio::net::{TcpListener, TcpStream};

use framecast_core::{error::DropReason, traits::FrameProcessor, types::FrameData};

use crate::{receiver::TcpFrameReceiver, sender::TcpFrameSender, ENCODED_FRAME_BUFFER};

async fn connected_pair() -> (TcpFrameSender, TcpFrameReceiver) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let accept_task =
        tokio::spawn(async move { TcpFrameReceiver::accept(ENCODED_FRAME_BUFFER, &listener).await });

    let sender = TcpFrameSender::connect(ENCODED_FRAME_BUFFER, address).await.unwrap();
    let receiver = accept_task.await.unwrap().unwrap();

    (sender, receiver)
}

fn frame_with_payload(payload: &'static [u8]) -> FrameData {
    let mut frame_data = FrameData::default();
    frame_data.insert_readonly_buffer(ENCODED_FRAME_BUFFER, Bytes::from_static(payload));
    frame_data
}

#[tokio::test]
async fn frames_cross_the_connection_in_order() {
    let (mut sender, mut receiver) = connected_pair().await;

    for payload in [&b"first"[..], &b""[..], &b"third frame"[..]] {
        let sent = sender.process(frame_with_payload(payload)).await.unwrap();
        assert_eq!(sent.get("transmitted_bytes"), Some(payload.len() as u128 + 4));

        let mut received = receiver.process(FrameData::default()).await.unwrap();
        assert!(received.get_drop_reason().is_none());
        assert_eq!(
            received.extract_readonly_buffer(ENCODED_FRAME_BUFFER).unwrap(),
            Bytes::from_static(payload)
        );
    }

    assert_eq!(receiver.received_frames(), 3);
}

#[tokio::test]
async fn closing_the_sender_ends_the_receiver_stream() {
    let (sender, mut receiver) = connected_pair().await;
    drop(sender);

    let received = receiver.process(FrameData::default()).await.unwrap();
    assert_eq!(received.get_drop_reason(), Some(DropReason::EndOfStream));
    assert!(received.is_terminal());
}

#[tokio::test]
async fn sender_flags_missing_buffers() {
    let (mut sender, _receiver) = connected_pair().await;

    let sent = sender.process(FrameData::default()).await.unwrap();
    assert_eq!(sent.get_drop_reason(), Some(DropReason::MissingBuffer));
}

#[tokio::test]
async fn oversized_announcement_is_a_protocol_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let writer_task = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;

        let mut stream = TcpStream::connect(address).await.unwrap();
        stream.write_all(&[0xFF, 0xFF, 0xFF, 0xFF]).await.unwrap();
        stream
    });

    let (stream, _) = listener.accept().await.unwrap();
    let mut receiver = TcpFrameReceiver::with_max_frame_length(ENCODED_FRAME_BUFFER, stream, 1024);

    let received = receiver.process(FrameData::default()).await.unwrap();
    assert_eq!(received.get_drop_reason(), Some(DropReason::ProtocolError));

    drop(writer_task.await.unwrap());
}
