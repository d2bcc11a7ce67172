//! The Pomodoro timer state machine
//!
//! A pure synchronous state machine: no clocks, no channels, no I/O. The
//! countdown task drives it through `tick()` once per second; everything else
//! happens through the transition operations below. Invalid operations are
//! no-ops, never errors, and configuration input is silently clamped.

use serde::{Deserialize, Serialize};

use crate::utils::clamp_number;

pub const MIN_MINUTES: u64 = 1;
pub const MAX_MINUTES: u64 = 180;
pub const MIN_CYCLES: u64 = 1;
pub const MAX_CYCLES: u64 = 12;

/// The four mutually exclusive modes a session can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Focus,
    Break,
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Focus => "focus",
            Phase::Break => "break",
            Phase::Complete => "complete",
        }
    }

    /// Human-readable label for display surfaces
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Ready",
            Phase::Focus => "Focus",
            Phase::Break => "Break",
            Phase::Complete => "Done",
        }
    }

    /// Whether a countdown can be active in this phase
    pub fn is_counting(&self) -> bool {
        matches!(self, Phase::Focus | Phase::Break)
    }
}

/// The mutable core entity: one focus session from `idle` to `complete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomodoroTimer {
    focus_minutes: u64,
    break_minutes: u64,
    cycles: u64,
    pub phase: Phase,
    pub current_cycle: u64,
    pub seconds_remaining: u64,
    pub is_running: bool,
    pub is_alarm_active: bool,
}

impl PomodoroTimer {
    /// Create a machine in `idle` showing the focus duration. Out-of-range
    /// configuration is clamped, same as the update operations.
    pub fn new(focus_minutes: u64, break_minutes: u64, cycles: u64) -> Self {
        let focus_minutes = clamp_number(focus_minutes as f64, MIN_MINUTES, MAX_MINUTES);
        let break_minutes = clamp_number(break_minutes as f64, MIN_MINUTES, MAX_MINUTES);
        let cycles = clamp_number(cycles as f64, MIN_CYCLES, MAX_CYCLES);

        Self {
            focus_minutes,
            break_minutes,
            cycles,
            phase: Phase::Idle,
            current_cycle: 1,
            seconds_remaining: focus_minutes * 60,
            is_running: false,
            is_alarm_active: false,
        }
    }

    pub fn focus_minutes(&self) -> u64 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u64 {
        self.break_minutes
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn focus_seconds(&self) -> u64 {
        self.focus_minutes * 60
    }

    pub fn break_seconds(&self) -> u64 {
        self.break_minutes * 60
    }

    /// Duration of the active phase in seconds; zero outside focus/break
    pub fn total_for_phase(&self) -> u64 {
        match self.phase {
            Phase::Focus => self.focus_seconds(),
            Phase::Break => self.break_seconds(),
            Phase::Idle | Phase::Complete => 0,
        }
    }

    /// Begin a fresh session from any phase
    pub fn start(&mut self) {
        self.is_alarm_active = false;
        self.current_cycle = 1;
        self.phase = Phase::Focus;
        self.seconds_remaining = self.focus_seconds();
        self.is_running = true;
    }

    /// Halt the countdown without touching phase, cycle, or remaining time
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Continue a paused countdown. From `idle` this is a fresh start; a
    /// completed session cannot be resumed.
    pub fn resume(&mut self) {
        match self.phase {
            Phase::Complete => {}
            Phase::Idle => self.start(),
            Phase::Focus | Phase::Break => self.is_running = true,
        }
    }

    /// Return to the initial shape with the current configuration
    pub fn reset(&mut self) {
        self.is_alarm_active = false;
        self.is_running = false;
        self.phase = Phase::Idle;
        self.current_cycle = 1;
        self.seconds_remaining = self.focus_seconds();
    }

    /// Clear the alarm flag. Safe to call when no alarm is active.
    pub fn stop_alarm(&mut self) {
        self.is_alarm_active = false;
    }

    /// Advance the countdown by one second. Returns true when the phase
    /// completed on this tick, which is the moment the alarm starts sounding.
    /// A no-op unless the machine is running in a focus/break phase.
    pub fn tick(&mut self) -> bool {
        if !self.is_running || !self.phase.is_counting() {
            return false;
        }
        if self.seconds_remaining > 0 {
            self.seconds_remaining -= 1;
        }
        if self.seconds_remaining == 0 {
            self.complete_phase();
            return true;
        }
        false
    }

    /// Phase-completion transition: a running countdown reached zero
    fn complete_phase(&mut self) {
        self.is_alarm_active = true;
        match self.phase {
            Phase::Focus => {
                if self.current_cycle >= self.cycles {
                    self.phase = Phase::Complete;
                    self.is_running = false;
                    self.seconds_remaining = 0;
                } else {
                    self.phase = Phase::Break;
                    self.seconds_remaining = self.break_seconds();
                }
            }
            Phase::Break => {
                let next_cycle = self.current_cycle + 1;
                if next_cycle > self.cycles {
                    self.phase = Phase::Complete;
                    self.is_running = false;
                    self.seconds_remaining = 0;
                } else {
                    self.current_cycle = next_cycle;
                    self.phase = Phase::Focus;
                    self.seconds_remaining = self.focus_seconds();
                }
            }
            Phase::Idle | Phase::Complete => {}
        }
    }

    /// Whether configuration may change right now. Edits are allowed at
    /// idle/complete and while paused, but not mid-countdown.
    fn config_locked(&self) -> bool {
        self.is_running && self.phase.is_counting()
    }

    pub fn update_focus_minutes(&mut self, value: f64) {
        if self.config_locked() {
            return;
        }
        self.focus_minutes = clamp_number(value, MIN_MINUTES, MAX_MINUTES);
        self.refresh_idle_display();
    }

    /// Break duration changes only take visible effect on next entry to break
    pub fn update_break_minutes(&mut self, value: f64) {
        if self.config_locked() {
            return;
        }
        self.break_minutes = clamp_number(value, MIN_MINUTES, MAX_MINUTES);
    }

    pub fn update_cycles(&mut self, value: f64) {
        if self.config_locked() {
            return;
        }
        self.cycles = clamp_number(value, MIN_CYCLES, MAX_CYCLES);
    }

    /// At idle/complete the displayed time tracks the focus duration
    fn refresh_idle_display(&mut self) {
        if !self.is_running && matches!(self.phase, Phase::Idle | Phase::Complete) {
            self.seconds_remaining = self.focus_seconds();
        }
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(25, 5, 4)
    }
}
