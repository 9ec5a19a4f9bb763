//! Small games whose animations run on a background task. The task never touches the
//! caller's state: it only posts events on a channel that the caller drains and renders.

pub mod lottery;
pub mod slots;
