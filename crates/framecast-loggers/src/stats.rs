use std::time::{Duration, Instant};

use framecast_core::{traits::FrameProcessor, types::FrameData};

use async_trait::async_trait;
use log::info;

pub struct ConsoleAverageStatsLogger {
    header: Option<String>,
    values_to_log: Vec<String>,
    round_duration: Duration,

    current_round_start: Instant,

    logged_frames: Vec<FrameData>,
}

impl Default for ConsoleAverageStatsLogger {
    fn default() -> Self {
        Self {
            header: None,
            values_to_log: Vec::new(),
            round_duration: Duration::from_secs(1),
            current_round_start: Instant::now(),
            logged_frames: Vec::new()
        }
    }
}

impl ConsoleAverageStatsLogger {
    pub fn new() -> Self {
        Self::default()
    }

    // Building functions
    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn log(mut self, value: &str) -> Self {
        self.values_to_log.push(value.to_string());
        self
    }

    pub fn round_duration(mut self, round_duration: Duration) -> Self {
        self.round_duration = round_duration;
        self
    }

    /// Average of `value` over the frames of the current round that carry it.
    pub fn average(&self, value: &str) -> Option<u128> {
        let samples: Vec<u128> = self
            .logged_frames
            .iter()
            .filter_map(|frame| frame.get(value))
            .collect();

        if samples.is_empty() {
            return None;
        }

        Some(samples.iter().sum::<u128>() / samples.len() as u128)
    }

    // Logging functions
    fn print_round_stats(&self) {
        if let Some(header) = &self.header {
            info!("{}", header);
        }

        if self.logged_frames.is_empty() {
            info!("No frames logged");
            return;
        }

        info!("Logged frames: {}", self.logged_frames.len());

        for value in &self.values_to_log {
            if let Some(avg) = self.average(value) {
                info!("Average {}: {}", value, avg);
            }
        }
    }

    fn reset_round(&mut self) {
        self.logged_frames.clear();
        self.current_round_start = Instant::now();
    }

    fn log_frame_data(&mut self, frame_data: &FrameData) {
        self.logged_frames.push(frame_data.clone_without_buffers());

        if self.current_round_start.elapsed() > self.round_duration {
            self.print_round_stats();
            self.reset_round();
        }
    }
}

#[async_trait]
impl FrameProcessor for ConsoleAverageStatsLogger {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData> {
        self.log_frame_data(&frame_data);
        Some(frame_data)
    }
}
