use std::{fs::{File, OpenOptions}, path::Path};

use chrono::Local;
use serde::Serialize;

use crate::detector::Detection;

#[derive(Serialize)]
struct DetectionRecord<'a> {
    timestamp: &'a str,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    area: u64,
}

/// Append-only `timestamp,x,y,w,h,area` log. The header row is written only when the
/// file starts empty.
pub struct DetectionLog {
    writer: csv::Writer<File>,
}

impl DetectionLog {
    pub fn open<P: AsRef<Path>>(path: P) -> csv::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_empty {
            writer.write_record(["timestamp", "x", "y", "w", "h", "area"])?;
            writer.flush()?;
        }

        Ok(Self { writer })
    }

    pub fn append(&mut self, detections: &[Detection]) -> csv::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        for detection in detections {
            self.writer.serialize(DetectionRecord {
                timestamp: &timestamp,
                x: detection.x,
                y: detection.y,
                w: detection.width,
                h: detection.height,
                area: detection.area(),
            })?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
