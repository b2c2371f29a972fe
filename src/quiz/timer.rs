//! Level timer
//!
//! Polled, never accumulated: CountUp stores its start instant and Blitz its
//! absolute deadline, and every read compares against the caller's clock.
//! Skipped frames or a suspended tab therefore cannot drift the clock.

use serde::Serialize;

use super::level::TimerMode;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TimerState {
    Stopped,
    CountUp { started_ms: f64 },
    /// Deadline only ever moves earlier (penalties)
    Blitz { deadline_ms: f64 },
    Expired,
}

/// What a poll observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Idle,
    Running,
    /// Emitted once, on the poll that crossed the deadline
    Expired,
}

/// Text and colour hint for the HUD
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerDisplay {
    pub text: String,
    pub over_threshold: bool,
}

/// Display thresholds (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerThresholds {
    pub blitz_warning_secs: f64,
    pub count_up_warning_secs: f64,
}

#[derive(Debug, Clone)]
pub struct TimerController {
    mode: TimerMode,
    state: TimerState,
    /// Last reading when stopped (elapsed for CountUp, remaining for Blitz)
    frozen_ms: Option<f64>,
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerController {
    pub fn new() -> Self {
        Self {
            mode: TimerMode::None,
            state: TimerState::Stopped,
            frozen_ms: None,
        }
    }

    /// Enter the running state for `mode` (None stays Stopped)
    pub fn start(&mut self, mode: TimerMode, now_ms: f64) {
        self.mode = mode;
        self.frozen_ms = None;
        self.state = match mode {
            TimerMode::None => TimerState::Stopped,
            TimerMode::CountUp => TimerState::CountUp { started_ms: now_ms },
            TimerMode::Blitz { seconds } => TimerState::Blitz {
                deadline_ms: now_ms + seconds.max(0.0) * 1000.0,
            },
        };
    }

    /// Leave a running state, keeping the final reading for display
    pub fn stop(&mut self, now_ms: f64) {
        self.frozen_ms = match self.state {
            TimerState::CountUp { started_ms } => Some((now_ms - started_ms).max(0.0)),
            TimerState::Blitz { deadline_ms } => Some((deadline_ms - now_ms).max(0.0)),
            TimerState::Expired => Some(0.0),
            TimerState::Stopped => self.frozen_ms,
        };
        if self.state != TimerState::Expired {
            self.state = TimerState::Stopped;
        }
    }

    /// Refresh against the clock; Blitz expires the instant remaining ≤ 0
    pub fn poll(&mut self, now_ms: f64) -> TimerTick {
        match self.state {
            TimerState::Blitz { deadline_ms } if deadline_ms - now_ms <= 0.0 => {
                self.state = TimerState::Expired;
                self.frozen_ms = Some(0.0);
                TimerTick::Expired
            }
            TimerState::Blitz { .. } | TimerState::CountUp { .. } => TimerTick::Running,
            TimerState::Stopped | TimerState::Expired => TimerTick::Idle,
        }
    }

    /// Pull the Blitz deadline earlier. Expiry is left to the next poll.
    pub fn apply_penalty(&mut self, seconds: f64) {
        if let TimerState::Blitz { deadline_ms } = &mut self.state {
            *deadline_ms -= seconds.max(0.0) * 1000.0;
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::CountUp { .. } | TimerState::Blitz { .. })
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// Blitz time left (clamped at zero); None outside Blitz
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        match (self.state, self.mode) {
            (TimerState::Blitz { deadline_ms }, _) => Some((deadline_ms - now_ms).max(0.0)),
            (TimerState::Expired, _) => Some(0.0),
            (TimerState::Stopped, TimerMode::Blitz { .. }) => self.frozen_ms,
            _ => None,
        }
    }

    /// CountUp time so far; None outside CountUp
    pub fn elapsed_ms(&self, now_ms: f64) -> Option<f64> {
        match (self.state, self.mode) {
            (TimerState::CountUp { started_ms }, _) => Some((now_ms - started_ms).max(0.0)),
            (TimerState::Stopped, TimerMode::CountUp) => self.frozen_ms,
            _ => None,
        }
    }

    /// HUD text; never feeds back into the state machine
    pub fn display(&self, now_ms: f64, thresholds: TimerThresholds) -> Option<TimerDisplay> {
        match self.mode {
            TimerMode::None => None,
            TimerMode::CountUp => {
                let elapsed = self.elapsed_ms(now_ms).unwrap_or(0.0);
                Some(TimerDisplay {
                    text: format_clock(elapsed, false),
                    over_threshold: elapsed > thresholds.count_up_warning_secs * 1000.0,
                })
            }
            TimerMode::Blitz { .. } => {
                let remaining = self.remaining_ms(now_ms).unwrap_or(0.0);
                Some(TimerDisplay {
                    text: format_clock(remaining, true),
                    over_threshold: remaining <= thresholds.blitz_warning_secs * 1000.0,
                })
            }
        }
    }
}

/// `mm:ss`; countdowns round up so "00:00" only shows once time is out
pub fn format_clock(ms: f64, round_up: bool) -> String {
    let secs = ms.max(0.0) / 1000.0;
    let whole = (if round_up { secs.ceil() } else { secs.floor() }) as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
