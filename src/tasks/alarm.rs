//! Alarm playback background task
//!
//! Consumes playback commands from the `AlarmPlayer` and models the sound
//! running its course: after the asset length elapses with no newer command,
//! the alarm flag is cleared exactly as if the audio had reached its natural
//! end. A newer play restarts the window; a stop abandons it.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::state::AppState;

pub async fn alarm_playback_task(state: Arc<AppState>) {
    info!("Starting alarm playback task");

    let mut commands = state.alarm.subscribe();

    loop {
        let command = *commands.borrow_and_update();

        if command.playing {
            debug!(
                "Alarm '{}' sounding for {:?}",
                state.alarm.asset(),
                state.alarm.length()
            );

            tokio::select! {
                _ = sleep(state.alarm.length()) => {
                    if let Err(e) = state.alarm_playback_ended(command.generation) {
                        warn!("Failed to clear alarm after playback: {}", e);
                    }
                    if commands.changed().await.is_err() {
                        return;
                    }
                }

                changed = commands.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // A newer play or stop took over; re-read it.
                }
            }
        } else if commands.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(&Config {
            port: 0,
            host: "127.0.0.1".to_string(),
            focus_minutes: 1,
            break_minutes: 1,
            cycles: 1,
            alarm_seconds: 2,
            data_dir: std::env::temp_dir(),
            verbose: false,
        }))
    }

    /// Drive the one-cycle session to completion so the alarm fires.
    fn complete_session(state: &AppState) {
        state.start().unwrap();
        for _ in 0..60 {
            state.advance_second().unwrap();
        }
        assert!(state.snapshot().unwrap().is_alarm_active);
    }

    #[tokio::test(start_paused = true)]
    async fn natural_end_clears_the_alarm_flag() {
        let state = test_state();
        let task = tokio::spawn(alarm_playback_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        complete_session(&state);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(!state.snapshot().unwrap().is_alarm_active);
        assert!(!state.alarm.current().playing);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn replay_restarts_the_playback_window() {
        let state = test_state();
        let task = tokio::spawn(alarm_playback_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        complete_session(&state);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Restart from the top; the old window no longer counts.
        state.alarm.play_from_start();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(state.snapshot().unwrap().is_alarm_active);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!state.snapshot().unwrap().is_alarm_active);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_abandons_the_window() {
        let state = test_state();
        let task = tokio::spawn(alarm_playback_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        complete_session(&state);
        state.stop_alarm().unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(!state.snapshot().unwrap().is_alarm_active);
        assert!(!state.alarm.current().playing);
        task.abort();
    }
}
