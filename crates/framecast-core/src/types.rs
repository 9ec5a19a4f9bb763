use std::{collections::HashMap, fmt::Display};

use bytes::{Bytes, BytesMut};

use crate::error::DropReason;

/// Everything a frame carries through a pipeline: named byte buffers, numeric stats
/// (ids, sizes, timestamps in milliseconds) and the reason it was dropped, if any.
#[derive(Default, Clone, Debug)]
pub struct FrameData {
    readonly_buffers: HashMap<String, Bytes>,
    writable_buffers: HashMap<String, BytesMut>,

    stats: HashMap<String, u128>,

    drop_reason: Option<DropReason>,
}

impl FrameData {
    /// An empty frame already carrying `reason`.
    pub fn dropped(reason: DropReason) -> Self {
        Self {
            drop_reason: Some(reason),
            ..Default::default()
        }
    }

    //*******//
    // Stats //
    //*******//

    pub fn set(&mut self, key: &str, value: u128) {
        self.stats.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<u128> {
        self.stats.get(key).copied()
    }

    pub fn has(&self, key: &str) -> bool {
        self.stats.contains_key(key)
    }

    pub fn get_stats(&self) -> &HashMap<String, u128> {
        &self.stats
    }

    pub fn merge_stats(&mut self, other_stats: HashMap<String, u128>) {
        self.stats.extend(other_stats);
    }

    pub fn frame_id(&self) -> Option<u128> {
        self.get("frame_id")
    }

    /// `(width, height)` of the raw frame, from the `width` and `height` stats.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let width = u32::try_from(self.get("width")?).ok()?;
        let height = u32::try_from(self.get("height")?).ok()?;
        Some((width, height))
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.set("width", width as u128);
        self.set("height", height as u128);
    }

    //*********//
    // Buffers //
    //*********//

    pub fn insert_readonly_buffer(&mut self, key: &str, buffer: Bytes) {
        self.readonly_buffers.insert(key.to_string(), buffer);
    }

    pub fn extract_readonly_buffer(&mut self, key: &str) -> Option<Bytes> {
        self.readonly_buffers.remove(key)
    }

    pub fn has_readonly_buffer(&self, key: &str) -> bool {
        self.readonly_buffers.contains_key(key)
    }

    pub fn get_readonly_buffer_ref(&self, key: &str) -> Option<&Bytes> {
        self.readonly_buffers.get(key)
    }

    pub fn insert_writable_buffer(&mut self, key: &str, buffer: BytesMut) {
        self.writable_buffers.insert(key.to_string(), buffer);
    }

    pub fn extract_writable_buffer(&mut self, key: &str) -> Option<BytesMut> {
        self.writable_buffers.remove(key)
    }

    pub fn get_writable_buffer_ref(&mut self, key: &str) -> Option<&mut BytesMut> {
        self.writable_buffers.get_mut(key)
    }

    pub fn has_writable_buffer(&self, key: &str) -> bool {
        self.writable_buffers.contains_key(key)
    }

    //*************//
    // Drop reason //
    //*************//

    pub fn set_drop_reason(&mut self, error: Option<DropReason>) {
        self.drop_reason = error;
    }

    pub fn get_drop_reason(&self) -> Option<DropReason> {
        self.drop_reason
    }

    pub fn is_terminal(&self) -> bool {
        self.drop_reason.map_or(false, |reason| reason.is_terminal())
    }

    //*******//
    // Other //
    //*******//

    pub fn clone_without_buffers(&self) -> Self {
        Self {
            stats: self.stats.clone(),
            drop_reason: self.drop_reason,

            ..Default::default()
        }
    }
}

impl Display for FrameData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.frame_id() {
            Some(frame_id) => write!(f, "#{}", frame_id)?,
            None => write!(f, "#?")?,
        }

        if let Some(reason) = self.drop_reason {
            write!(f, " dropped ({})", reason)?;
        }

        let readonly_sizes: Vec<(&String, usize)> =
            self.readonly_buffers.iter().map(|(key, buffer)| (key, buffer.len())).collect();
        let writable_sizes: Vec<(&String, usize)> =
            self.writable_buffers.iter().map(|(key, buffer)| (key, buffer.len())).collect();

        write!(
            f,
            " {{ readonly: {:?}, writable: {:?}, stats: {:?} }}",
            readonly_sizes, writable_sizes, self.stats
        )
    }
}
