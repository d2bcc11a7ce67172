//! Main application state management
//!
//! `AppState` is the session host: it owns the one `PomodoroTimer` for the
//! lifetime of the process and is handed to every view and background task as
//! an `Arc`. Views never touch the machine directly; they call the operation
//! methods here and read snapshots, either on demand or through `subscribe()`.

use std::{
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{snapshot::TimerSnapshot, timer::{Phase, PomodoroTimer}};
use crate::{config::Config, services::AlarmPlayer};

#[derive(Debug)]
pub struct AppState {
    /// The single timer state machine for this session
    timer: Mutex<PomodoroTimer>,
    /// Channel for snapshot updates after every mutation
    timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerSnapshot>,
    /// Alarm sound handle
    pub alarm: AlarmPlayer,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    pub data_dir: PathBuf,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the session host from the server configuration
    pub fn new(config: &Config) -> Self {
        let timer = PomodoroTimer::new(config.focus_minutes, config.break_minutes, config.cycles);
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::of(&timer));

        Self {
            timer: Mutex::new(timer),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            alarm: AlarmPlayer::new("alarm.wav", Duration::from_secs(config.alarm_seconds)),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            data_dir: config.data_dir.clone(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Apply a transition operation and notify all snapshot subscribers
    fn with_timer<F>(&self, action: &str, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut PomodoroTimer),
    {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        updater(&mut timer);
        let snapshot = TimerSnapshot::of(&timer);
        drop(timer); // Release the lock early

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.notify(&snapshot);
        Ok(snapshot)
    }

    fn notify(&self, snapshot: &TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Begin a fresh session, cancelling any sounding alarm
    pub fn start(&self) -> Result<TimerSnapshot, String> {
        info!("Starting a fresh pomodoro session");
        self.alarm.stop();
        self.with_timer("start", |timer| timer.start())
    }

    pub fn pause(&self) -> Result<TimerSnapshot, String> {
        self.with_timer("pause", |timer| timer.pause())
    }

    pub fn resume(&self) -> Result<TimerSnapshot, String> {
        // Resuming from idle is a fresh start, which cancels any alarm.
        if self.snapshot()?.phase == Phase::Idle {
            self.alarm.stop();
        }
        self.with_timer("resume", |timer| timer.resume())
    }

    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        info!("Resetting the pomodoro session");
        self.alarm.stop();
        self.with_timer("reset", |timer| timer.reset())
    }

    pub fn stop_alarm(&self) -> Result<TimerSnapshot, String> {
        self.alarm.stop();
        self.with_timer("stop-alarm", |timer| timer.stop_alarm())
    }

    pub fn update_focus_minutes(&self, value: f64) -> Result<TimerSnapshot, String> {
        self.with_timer("update-focus", |timer| timer.update_focus_minutes(value))
    }

    pub fn update_break_minutes(&self, value: f64) -> Result<TimerSnapshot, String> {
        self.with_timer("update-break", |timer| timer.update_break_minutes(value))
    }

    pub fn update_cycles(&self, value: f64) -> Result<TimerSnapshot, String> {
        self.with_timer("update-cycles", |timer| timer.update_cycles(value))
    }

    /// Advance the countdown by one second. Called by the countdown task
    /// only; not tracked as a user action. Sounds the alarm on a phase
    /// completion, best-effort.
    pub fn advance_second(&self) -> Result<TimerSnapshot, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let alarm_fired = timer.tick();
        let snapshot = TimerSnapshot::of(&timer);
        drop(timer);

        if alarm_fired {
            self.alarm.play_from_start();
        }

        self.notify(&snapshot);
        Ok(snapshot)
    }

    /// The alarm sound ran to its natural end; clear the flag unless a newer
    /// play or stop already superseded that playback
    pub fn alarm_playback_ended(&self, generation: u64) -> Result<(), String> {
        if !self.alarm.finish(generation) {
            return Ok(());
        }

        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;
        timer.stop_alarm();
        let snapshot = TimerSnapshot::of(&timer);
        drop(timer);

        self.notify(&snapshot);
        Ok(())
    }

    /// Get the current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.timer.lock()
            .map(|timer| TimerSnapshot::of(&timer))
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Subscribe to snapshot updates. Every handle observes the same machine;
    /// there is nothing to reconcile between subscribers.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(focus: u64, brk: u64, cycles: u64) -> AppState {
        AppState::new(&Config {
            port: 0,
            host: "127.0.0.1".to_string(),
            focus_minutes: focus,
            break_minutes: brk,
            cycles,
            alarm_seconds: 2,
            data_dir: std::env::temp_dir(),
            verbose: false,
        })
    }

    #[test]
    fn two_subscriber_handles_observe_identical_state() {
        let state = test_state(25, 5, 4);
        let rx_panel = state.subscribe();
        let rx_widget = state.subscribe();

        state.start().unwrap();
        state.advance_second().unwrap();

        let panel = rx_panel.borrow().clone();
        let widget = rx_widget.borrow().clone();
        assert_eq!(panel, widget);
        assert_eq!(panel.seconds_remaining, 25 * 60 - 1);
        assert_eq!(panel, state.snapshot().unwrap());
    }

    #[test]
    fn advance_second_decrements_while_running() {
        let state = test_state(25, 5, 4);
        state.start().unwrap();
        for _ in 0..10 {
            state.advance_second().unwrap();
        }
        assert_eq!(state.snapshot().unwrap().seconds_remaining, 1490);
    }

    #[test]
    fn advance_second_is_a_no_op_while_paused() {
        let state = test_state(25, 5, 4);
        state.start().unwrap();
        state.pause().unwrap();
        for _ in 0..10 {
            state.advance_second().unwrap();
        }
        assert_eq!(state.snapshot().unwrap().seconds_remaining, 1500);
    }

    #[test]
    fn completion_sounds_the_alarm() {
        let state = test_state(1, 1, 1);
        state.start().unwrap();
        for _ in 0..60 {
            state.advance_second().unwrap();
        }
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.phase, Phase::Complete);
        assert!(snapshot.is_alarm_active);
        assert!(state.alarm.current().playing);
    }

    #[test]
    fn stop_alarm_halts_playback_and_clears_the_flag() {
        let state = test_state(1, 1, 1);
        state.start().unwrap();
        for _ in 0..60 {
            state.advance_second().unwrap();
        }
        state.stop_alarm().unwrap();
        assert!(!state.snapshot().unwrap().is_alarm_active);
        assert!(!state.alarm.current().playing);

        // Idempotent.
        state.stop_alarm().unwrap();
        assert!(!state.snapshot().unwrap().is_alarm_active);
    }

    #[test]
    fn stale_playback_end_does_not_clear_a_newer_alarm() {
        let state = test_state(1, 1, 1);
        state.start().unwrap();
        for _ in 0..60 {
            state.advance_second().unwrap();
        }
        let stale = state.alarm.current().generation;
        // A newer playback supersedes the one that is about to end.
        state.alarm.play_from_start();
        state.alarm_playback_ended(stale).unwrap();
        assert!(state.snapshot().unwrap().is_alarm_active);
        assert!(state.alarm.current().playing);
    }

    #[test]
    fn natural_playback_end_clears_the_flag() {
        let state = test_state(1, 1, 1);
        state.start().unwrap();
        for _ in 0..60 {
            state.advance_second().unwrap();
        }
        let generation = state.alarm.current().generation;
        state.alarm_playback_ended(generation).unwrap();
        assert!(!state.snapshot().unwrap().is_alarm_active);
        assert!(!state.alarm.current().playing);
    }

    #[test]
    fn starting_records_the_last_action() {
        let state = test_state(25, 5, 4);
        state.start().unwrap();
        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());
    }

    #[test]
    fn reset_through_the_host_matches_the_machine_contract() {
        let state = test_state(25, 5, 4);
        state.start().unwrap();
        for _ in 0..100 {
            state.advance_second().unwrap();
        }
        let snapshot = state.reset().unwrap();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.current_cycle, 1);
        assert_eq!(snapshot.seconds_remaining, 1500);
        assert!(!snapshot.is_running);
        assert!(!snapshot.is_alarm_active);
    }
}
