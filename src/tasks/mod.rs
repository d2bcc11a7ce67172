//! Background tasks module
//!
//! Long-lived loops spawned alongside the HTTP server: the one-second
//! countdown scheduler and the alarm playback lifecycle.

pub mod alarm;
pub mod countdown;

pub use alarm::alarm_playback_task;
pub use countdown::countdown_task;
