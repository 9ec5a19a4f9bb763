pub mod errors;
pub mod frame_dump;
pub mod stats;
