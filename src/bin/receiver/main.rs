use std::{io, path::PathBuf};

use clap::Parser;
use futures::future::join_all;
use log::info;
use tokio::net::TcpListener;

use framecast::{
    codecs::jpeg::JpegDecoder,
    detection::{overlay::DetectionOverlay, DEFAULT_MIN_CONFIDENCE},
    error::DropReason,
    loggers::{errors::ConsoleDropReasonLogger, frame_dump::FrameDumper, stats::ConsoleAverageStatsLogger},
    pipeline::{component::Component, Pipeline},
    processors::error_switch::OnErrorSwitch,
    profilation::time::{add::TimestampAdder, diff::TimestampDiffCalculator},
    transmission::{framing::DEFAULT_MAX_FRAME_LENGTH, receiver::TcpFrameReceiver, DEFAULT_PORT, ENCODED_FRAME_BUFFER},
    RAW_FRAME_BUFFER,
};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Receives JPEG frames from a streamer and dumps them to disk")]
pub struct CommandLineReceiverOptions {
    #[clap(long, default_value = "0.0.0.0")]
    host: String,

    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Folder the decoded frames are written to
    #[clap(short, long, default_value = "frames")]
    output: PathBuf,

    #[clap(long, default_value_t = DEFAULT_MAX_FRAME_LENGTH)]
    max_frame_length: usize,

    /// YOLOv8 ONNX model used to detect objects in the received frames
    #[clap(long)]
    model: Option<PathBuf>,

    /// File with one class label per line, defaults to the COCO classes
    #[clap(long, requires = "model")]
    labels: Option<PathBuf>,

    #[clap(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    min_confidence: f32,

    /// CSV file the detected boxes are appended to
    #[clap(long, requires = "model")]
    detections_log: Option<PathBuf>,
}

#[cfg(feature = "onnx")]
fn detection_stage(options: &CommandLineReceiverOptions) -> io::Result<Option<DetectionOverlay>> {
    use framecast::detection::{detection_log::DetectionLog, onnx::YoloDetector};

    let model = match &options.model {
        Some(model) => model,
        None => return Ok(None),
    };

    let mut detector = YoloDetector::open(model)
        .map_err(|error| io::Error::new(io::ErrorKind::Other, error.to_string()))?
        .min_confidence(options.min_confidence);

    if let Some(labels) = &options.labels {
        let labels = std::fs::read_to_string(labels)?
            .lines()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        detector = detector.labels(labels);
    }
    info!("Detecting objects with {}", model.display());

    let mut overlay = DetectionOverlay::new(RAW_FRAME_BUFFER, detector).min_confidence(options.min_confidence);
    if let Some(path) = &options.detections_log {
        let log = DetectionLog::open(path).map_err(|error| io::Error::new(io::ErrorKind::Other, error))?;
        overlay = overlay.log_to(log);
    }

    Ok(Some(overlay))
}

#[cfg(not(feature = "onnx"))]
fn detection_stage(options: &CommandLineReceiverOptions) -> io::Result<Option<DetectionOverlay>> {
    match options.model {
        Some(_) => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "object detection needs the receiver built with the onnx feature",
        )),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let options = CommandLineReceiverOptions::parse();

    let detection_overlay = detection_stage(&options)?;

    let listener = TcpListener::bind((options.host.as_str(), options.port)).await?;
    info!("Listening on {}...", listener.local_addr()?);
    let (stream, peer_address) = listener.accept().await?;
    info!("Connected by {}", peer_address);

    let error_handling_pipeline = Pipeline::new()
        .tag("ReceiverErrors")
        .link(
            Component::new().append(
                ConsoleDropReasonLogger::new()
                    .header("--- Dropped frames")
                    .log(DropReason::CodecError)
                    .log(DropReason::MissingBuffer),
            ),
        )
        .feedable();

    let main_pipeline = Pipeline::new()
        .tag("ReceiverMain")
        .link(
            Component::new()
                .tag("ReceiverMain")
                .append(TcpFrameReceiver::with_max_frame_length(
                    ENCODED_FRAME_BUFFER,
                    stream,
                    options.max_frame_length,
                ))
                .append(TimestampAdder::new("decoding_start_timestamp"))
                .append(JpegDecoder::new(ENCODED_FRAME_BUFFER, RAW_FRAME_BUFFER))
                .append(TimestampDiffCalculator::new("decoding_start_timestamp", "decoding_time"))
                .append(OnErrorSwitch::new(&error_handling_pipeline)),
        )
        .link({
            let mut display = Component::new().tag("ReceiverDisplay");
            if let Some(overlay) = detection_overlay {
                display = display
                    .append(TimestampAdder::new("detection_start_timestamp"))
                    .append(overlay)
                    .append(TimestampDiffCalculator::new("detection_start_timestamp", "detection_time"));
            }

            display.append(FrameDumper::new(RAW_FRAME_BUFFER, options.output)?).append(
                ConsoleAverageStatsLogger::new()
                    .header("--- Receiving stats")
                    .log("received_bytes")
                    .log("decoding_time")
                    .log("detection_time"),
            )
        });

    let mut handles = Vec::new();
    handles.extend(error_handling_pipeline.run());
    handles.extend(main_pipeline.run());

    tokio::select! {
        _ = join_all(handles) => info!("Stream ended"),
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    Ok(())
}
