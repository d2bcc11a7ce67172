//! Utility functions module

pub mod duration;
pub mod signals;

pub use duration::{clamp_number, format_elapsed};
pub use signals::shutdown_signal;
