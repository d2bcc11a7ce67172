//! Focusdesk - A state-managed HTTP server for a personal productivity
//! dashboard
//!
//! The core is a Pomodoro timer engine: a synchronous state machine owned by
//! a process-wide session host, driven by a one-second countdown task, with
//! an alarm whose playback lifecycle is decoupled from the countdown. Around
//! it sit two small expense demo endpoints.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::shutdown_signal;
