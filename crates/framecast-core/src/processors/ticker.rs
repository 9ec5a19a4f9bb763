use std::time::Duration;

use async_trait::async_trait;

use tokio::time::{Interval, MissedTickBehavior};

use crate::{traits::FrameProcessor, types::FrameData};

const MIN_PERIOD: Duration = Duration::from_micros(1);

/// Paces a component to at most one frame per tick. Must be built inside a tokio runtime.
pub struct Ticker {
    interval: Interval,
}

impl Ticker {
    /// Ticks every `tick_interval` milliseconds, at least every millisecond.
    pub fn new(tick_interval: u64) -> Self {
        Self::with_period(Duration::from_millis(tick_interval.max(1)))
    }

    /// Ticks `fps` times per second. Zero is treated as one.
    pub fn from_fps(fps: u32) -> Self {
        Self::with_period(Duration::from_secs_f64(1.0 / fps.max(1) as f64))
    }

    fn with_period(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period.max(MIN_PERIOD));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl FrameProcessor for Ticker {
    async fn process(&mut self, frame_data: FrameData) -> Option<FrameData> {
        self.interval.tick().await;
        Some(frame_data)
    }
}
