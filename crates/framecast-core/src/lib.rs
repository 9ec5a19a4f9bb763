//! framecast-core holds the pieces every framecast program is assembled from: the
//! [`types::FrameData`] DTO that travels along a pipeline, the [`traits::FrameProcessor`]
//! trait implemented by every stage, and the channel-linked [`pipeline::Pipeline`] runtime.

pub mod common;

pub mod pipeline;

pub mod traits;
pub mod types;
pub mod error;

pub mod processors;
