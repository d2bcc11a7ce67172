//! Read-only snapshot of the timer for views and the wire

use serde::{Deserialize, Serialize};

use super::timer::{Phase, PomodoroTimer};
use crate::utils::format_elapsed;

/// Everything a view needs to render the timer, captured at one instant.
/// Derived fields are computed here, never stored in the machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub phase_label: String,
    pub current_cycle: u64,
    pub seconds_remaining: u64,
    /// Zero-padded `MM:SS` of the remaining time
    pub display: String,
    pub is_running: bool,
    pub is_alarm_active: bool,
    pub focus_minutes: u64,
    pub break_minutes: u64,
    pub cycles: u64,
    pub total_for_phase: u64,
    pub progress_percent: f64,
}

impl TimerSnapshot {
    pub fn of(timer: &PomodoroTimer) -> Self {
        let total = timer.total_for_phase();
        // A paused-phase config edit can leave more time remaining than the
        // new phase total; saturate rather than underflow.
        let progress_percent = if total == 0 {
            0.0
        } else {
            let elapsed = total.saturating_sub(timer.seconds_remaining);
            (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };

        Self {
            phase: timer.phase,
            phase_label: timer.phase.label().to_string(),
            current_cycle: timer.current_cycle,
            seconds_remaining: timer.seconds_remaining,
            display: format_elapsed(timer.seconds_remaining as i64),
            is_running: timer.is_running,
            is_alarm_active: timer.is_alarm_active,
            focus_minutes: timer.focus_minutes(),
            break_minutes: timer.break_minutes(),
            cycles: timer.cycles(),
            total_for_phase: total,
            progress_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_snapshot_has_zero_progress() {
        let timer = PomodoroTimer::new(25, 5, 4);
        let snapshot = TimerSnapshot::of(&timer);
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.display, "25:00");
        assert_eq!(snapshot.total_for_phase, 0);
        assert_eq!(snapshot.progress_percent, 0.0);
    }

    #[test]
    fn progress_tracks_elapsed_share_of_the_phase() {
        let mut timer = PomodoroTimer::new(25, 5, 4);
        timer.start();
        for _ in 0..375 {
            timer.tick();
        }
        let snapshot = TimerSnapshot::of(&timer);
        assert_eq!(snapshot.seconds_remaining, 1125);
        assert!((snapshot.progress_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn progress_saturates_when_remaining_exceeds_phase_total() {
        let mut timer = PomodoroTimer::new(25, 5, 4);
        timer.start();
        timer.pause();
        timer.update_focus_minutes(1.0);
        // Remaining is still 1500 against a 60-second phase total.
        let snapshot = TimerSnapshot::of(&timer);
        assert_eq!(snapshot.progress_percent, 0.0);
    }

    #[test]
    fn phase_serializes_lowercase() {
        let timer = PomodoroTimer::new(25, 5, 4);
        let json = serde_json::to_value(TimerSnapshot::of(&timer)).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["phase_label"], "Ready");
    }
}
