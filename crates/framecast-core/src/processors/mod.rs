pub mod ticker;

pub mod error_switch;
pub mod functional;
