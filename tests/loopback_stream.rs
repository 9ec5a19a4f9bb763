use std::{fs, path::Path, time::Duration};

use futures::future::join_all;
use image::{Rgb, RgbImage};
use tokio::net::{TcpListener, TcpStream};

use framecast::{
    capture::image_sequence::ImageSequenceCapturer,
    codecs::{
        jpeg::{JpegDecoder, JpegEncoder},
        DEFAULT_JPEG_QUALITY,
    },
    detection::{detection_log::DetectionLog, detector::Detection, overlay::DetectionOverlay},
    loggers::frame_dump::FrameDumper,
    pipeline::{component::Component, Pipeline},
    transmission::{receiver::TcpFrameReceiver, sender::TcpFrameSender, ENCODED_FRAME_BUFFER},
    RAW_FRAME_BUFFER,
};

const FRAMES: u8 = 3;

fn centered_square(image: &RgbImage) -> Vec<Detection> {
    vec![Detection {
        x: image.width() / 4,
        y: image.height() / 4,
        width: image.width() / 2,
        height: image.height() / 2,
        label: "square".to_string(),
        confidence: 0.8,
    }]
}

fn write_source_frames(folder: &Path) {
    for index in 0..FRAMES {
        let shade = 40 * (index + 1);
        let image = RgbImage::from_pixel(32, 24, Rgb([shade, shade, shade]));
        image.save(folder.join(format!("source_{}.png", index))).unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn every_frame_reaches_the_receiver_and_both_ends_stop() {
    let workspace = tempfile::tempdir().unwrap();
    let source_folder = workspace.path().join("source");
    let dump_folder = workspace.path().join("dump");
    let log_path = workspace.path().join("detections.csv");

    fs::create_dir_all(&source_folder).unwrap();
    write_source_frames(&source_folder);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let stream = TcpStream::connect(address).await.unwrap();
    let receiver = TcpFrameReceiver::accept(ENCODED_FRAME_BUFFER, &listener).await.unwrap();

    let streamer_pipeline = Pipeline::singleton(
        Component::new()
            .tag("TestStreamer")
            .append(ImageSequenceCapturer::open(RAW_FRAME_BUFFER, &source_folder).unwrap())
            .append(JpegEncoder::new(RAW_FRAME_BUFFER, ENCODED_FRAME_BUFFER, DEFAULT_JPEG_QUALITY))
            .append(TcpFrameSender::new(ENCODED_FRAME_BUFFER, stream)),
    )
    .tag("TestStreamer");

    let receiver_pipeline = Pipeline::new()
        .tag("TestReceiver")
        .link(
            Component::new()
                .append(receiver)
                .append(JpegDecoder::new(ENCODED_FRAME_BUFFER, RAW_FRAME_BUFFER)),
        )
        .link(
            Component::new()
                .append(
                    DetectionOverlay::new(RAW_FRAME_BUFFER, centered_square)
                        .log_to(DetectionLog::open(&log_path).unwrap()),
                )
                .append(FrameDumper::new(RAW_FRAME_BUFFER, dump_folder.clone()).unwrap()),
        );

    let mut handles = Vec::new();
    handles.extend(receiver_pipeline.run());
    handles.extend(streamer_pipeline.run());

    let results = tokio::time::timeout(Duration::from_secs(30), join_all(handles))
        .await
        .expect("pipelines did not stop after the end of the stream");
    assert!(results.iter().all(|result| result.is_ok()));

    for frame_id in 0..FRAMES {
        let dumped = image::open(dump_folder.join(format!("frame_{:06}.jpg", frame_id))).unwrap();
        assert_eq!((dumped.width(), dumped.height()), (32, 24));
    }
    assert_eq!(fs::read_dir(&dump_folder).unwrap().count(), FRAMES as usize);

    let log = fs::read_to_string(&log_path).unwrap();
    let rows: Vec<&str> = log.lines().collect();
    assert_eq!(rows[0], "timestamp,x,y,w,h,area");
    assert_eq!(rows.len(), 1 + FRAMES as usize);
    assert!(rows[1..].iter().all(|row| row.ends_with(",8,6,16,12,192")));
}
