use std::{io, path::PathBuf};

use clap::Parser;
use futures::future::join_all;
use log::info;
use tokio::net::TcpStream;

use framecast::{
    capture::{image_sequence::ImageSequenceCapturer, y4m::Y4MFrameCapturer, CapturerError},
    codecs::{jpeg::JpegEncoder, DEFAULT_JPEG_QUALITY},
    error::DropReason,
    loggers::{errors::ConsoleDropReasonLogger, stats::ConsoleAverageStatsLogger},
    pipeline::{component::Component, Pipeline},
    processors::{error_switch::OnErrorSwitch, ticker::Ticker},
    traits::FrameProcessor,
    profilation::time::{add::TimestampAdder, diff::TimestampDiffCalculator},
    transmission::{framing::DEFAULT_MAX_FRAME_LENGTH, sender::TcpFrameSender, DEFAULT_PORT, ENCODED_FRAME_BUFFER},
    RAW_FRAME_BUFFER,
};

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Streams JPEG-encoded frames to a receiver over TCP")]
pub struct CommandLineStreamerOptions {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// YUV4MPEG2 video file to stream
    #[clap(long)]
    y4m: Option<PathBuf>,

    /// Folder of JPEG/PNG images to stream in lexical order
    #[clap(long)]
    images: Option<PathBuf>,

    #[clap(short, long, default_value_t = DEFAULT_JPEG_QUALITY)]
    quality: u8,

    /// Frames per second, 0 streams as fast as possible
    #[clap(long, default_value = "0")]
    fps: u32,

    #[clap(long, default_value_t = DEFAULT_MAX_FRAME_LENGTH)]
    max_frame_length: usize,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let options = CommandLineStreamerOptions::parse();

    let error_handling_pipeline = Pipeline::new()
        .tag("StreamerErrors")
        .link(
            Component::new().append(
                ConsoleDropReasonLogger::new()
                    .header("--- Dropped frames")
                    .log(DropReason::CodecError)
                    .log(DropReason::MissingBuffer)
                    .log(DropReason::OversizedFrame),
            ),
        )
        .feedable();

    let mut head = Component::new().tag("StreamerMain");
    if options.fps > 0 {
        head = head.append(Ticker::from_fps(options.fps));
    }
    head = head.append(TimestampAdder::new("process_start_timestamp"));
    head = head.append(open_capturer(&options)?);

    let stream = TcpStream::connect((options.host.as_str(), options.port)).await?;
    stream.set_nodelay(true)?;
    info!("Connected to {}", stream.peer_addr()?);
    let sender = TcpFrameSender::with_max_frame_length(ENCODED_FRAME_BUFFER, stream, options.max_frame_length);

    let main_pipeline = Pipeline::new()
        .tag("StreamerMain")
        .link(
            head.append(TimestampAdder::new("encoding_start_timestamp"))
                .append(JpegEncoder::new(RAW_FRAME_BUFFER, ENCODED_FRAME_BUFFER, options.quality))
                .append(TimestampDiffCalculator::new("encoding_start_timestamp", "encoding_time"))
                .append(OnErrorSwitch::new(&error_handling_pipeline)),
        )
        .link(
            Component::new()
                .tag("StreamerTransmission")
                .append(TimestampAdder::new("transmission_start_timestamp"))
                .append(sender)
                .append(TimestampDiffCalculator::new("transmission_start_timestamp", "transmission_time"))
                .append(TimestampDiffCalculator::new("process_start_timestamp", "total_time"))
                .append(OnErrorSwitch::new(&error_handling_pipeline))
                .append(
                    ConsoleAverageStatsLogger::new()
                        .header("--- Streaming stats")
                        .log("encoded_size")
                        .log("encoding_time")
                        .log("transmission_time")
                        .log("total_time"),
                ),
        );

    let mut handles = Vec::new();
    handles.extend(error_handling_pipeline.run());
    handles.extend(main_pipeline.run());

    tokio::select! {
        _ = join_all(handles) => info!("Stream completed"),
        _ = tokio::signal::ctrl_c() => info!("Interrupted, closing the stream"),
    }

    Ok(())
}

fn open_capturer(options: &CommandLineStreamerOptions) -> io::Result<Box<dyn FrameProcessor + Send>> {
    let to_io_error = |error: CapturerError| io::Error::new(io::ErrorKind::InvalidInput, format!("{}", error));

    match (&options.y4m, &options.images) {
        (Some(path), None) => {
            let capturer = Y4MFrameCapturer::open(RAW_FRAME_BUFFER, path).map_err(to_io_error)?;
            let (width, height) = capturer.dimensions();
            info!("Streaming {} ({}x{})", path.display(), width, height);
            Ok(Box::new(capturer))
        }
        (None, Some(folder)) => {
            let capturer = ImageSequenceCapturer::open(RAW_FRAME_BUFFER, folder).map_err(to_io_error)?;
            info!("Streaming {} images from {}", capturer.remaining(), folder.display());
            Ok(Box::new(capturer))
        }
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "exactly one of --y4m or --images must be given",
        )),
    }
}
