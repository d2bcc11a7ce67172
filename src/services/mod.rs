//! External collaborator wrappers
//!
//! The only collaborator the timer core talks to is the alarm sound asset.

pub mod alarm;

pub use alarm::{AlarmPlayer, PlaybackCommand};
