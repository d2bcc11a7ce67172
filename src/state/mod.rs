//! State management module
//!
//! The timer state machine, its derived snapshot, and the session host that
//! owns the single machine instance for the process.

pub mod app_state;
pub mod snapshot;
pub mod timer;

pub use app_state::AppState;
pub use snapshot::TimerSnapshot;
pub use timer::{Phase, PomodoroTimer};
