use std::time::{Duration, Instant};

use framecast_core::{error::DropReason, traits::FrameProcessor, types::FrameData};

use async_trait::async_trait;
use log::info;

pub struct ConsoleDropReasonLogger {
    header: Option<String>,
    types_to_log: Vec<DropReason>,
    round_duration: Duration,

    current_round_start: Instant,

    logged_reasons: Vec<DropReason>,
}

impl Default for ConsoleDropReasonLogger {
    fn default() -> Self {
        Self {
            header: None,
            types_to_log: Vec::new(),
            round_duration: Duration::from_secs(1),
            current_round_start: Instant::now(),
            logged_reasons: Vec::new(),
        }
    }
}

impl ConsoleDropReasonLogger {
    pub fn new() -> Self {
        Self::default()
    }

    // Building functions
    pub fn header(mut self, header: &str) -> Self {
        self.header = Some(header.to_string());
        self
    }

    pub fn log(mut self, value: DropReason) -> Self {
        self.types_to_log.push(value);
        self
    }

    pub fn round_duration(mut self, round_duration: Duration) -> Self {
        self.round_duration = round_duration;
        self
    }

    pub fn count(&self, reason_type: DropReason) -> usize {
        self.logged_reasons
            .iter()
            .filter(|reason| **reason == reason_type)
            .count()
    }

    // Logging functions
    fn print_round_stats(&self) {
        if let Some(header) = &self.header {
            info!("{}", header);
        }

        info!("Dropped frames: {}", self.logged_reasons.len());

        for reason_type in &self.types_to_log {
            let count = self.count(*reason_type);
            if count > 0 {
                info!("{}: {}", reason_type, count);
            }
        }
    }

    fn reset_round(&mut self) {
        self.logged_reasons.clear();
        self.current_round_start = Instant::now();
    }

    fn log_frame_data(&mut self, frame_data: &FrameData) {
        let reason = match frame_data.get_drop_reason() {
            Some(reason) => reason,
            None => return,
        };

        self.logged_reasons.push(reason);

        if self.current_round_start.elapsed() > self.round_duration {
            self.print_round_stats();
            self.reset_round();
        }
    }
}

#[async_trait]
impl FrameProcessor for ConsoleDropReasonLogger {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData> {
        self.log_frame_data(&frame_data);
        Some(frame_data)
    }
}
