//! Pomodoro timer state machine.
//!
//! The timer is driven externally: the caller invokes [`PomodoroTimer::tick`]
//! once per second while the timer is running. Completing a session switches
//! mode and reports whether the next session should start on its own.

use serde::{Deserialize, Serialize};

/// Longest session length in minutes; longer stored values are clamped
pub const MAX_MINUTES: u32 = 24 * 60;

/// Timer settings, stored camelCase so saved partial settings merge over defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    /// Focus session length in minutes
    pub pomodoro: u32,

    /// Short break length in minutes
    pub short_break: u32,

    /// Long break length in minutes
    pub long_break: u32,

    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,

    /// Number of pomodoros between long breaks
    pub long_break_interval: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            pomodoro: 25,
            short_break: 5,
            long_break: 15,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            long_break_interval: 4,
        }
    }
}

impl TimerSettings {
    /// Length of a mode in seconds
    pub fn duration_secs(&self, mode: TimerMode) -> u32 {
        let minutes = match mode {
            TimerMode::Pomodoro => self.pomodoro,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        };
        minutes.min(MAX_MINUTES) * 60
    }
}

/// Timer session kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

impl std::str::FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "pomodoro" | "focus" => Ok(TimerMode::Pomodoro),
            "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "longbreak" | "long" => Ok(TimerMode::LongBreak),
            _ => Err(format!("Unknown timer mode: {}", s)),
        }
    }
}

/// Result of finishing a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Mode that just finished
    pub finished: TimerMode,

    /// Mode the timer switched to
    pub next_mode: TimerMode,

    /// Whether the next session should start automatically
    pub auto_start: bool,
}

/// Countdown timer cycling pomodoros and breaks
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: TimerSettings,
    mode: TimerMode,
    remaining: u32,
    total: u32,
    running: bool,
    completed: u32,
}

impl PomodoroTimer {
    pub fn new(settings: TimerSettings) -> Self {
        let total = settings.duration_secs(TimerMode::Pomodoro);
        Self {
            settings,
            mode: TimerMode::Pomodoro,
            remaining: total,
            total,
            running: false,
            completed: 0,
        }
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pomodoros_completed(&self) -> u32 {
        self.completed
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop and rewind the current mode to its full length
    pub fn reset(&mut self) {
        self.pause();
        self.total = self.settings.duration_secs(self.mode);
        self.remaining = self.total;
    }

    /// Stop and switch to `mode` at its full length
    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.reset();
    }

    /// Replace settings and reset the current mode
    pub fn apply_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
        self.reset();
    }

    /// Advance one second; returns the completion when the session ends
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return Some(self.complete());
        }
        None
    }

    /// Finish the current session and move to the next mode
    pub fn complete(&mut self) -> Completion {
        let finished = self.mode;
        let (next_mode, auto_start) = match finished {
            TimerMode::Pomodoro => {
                self.completed += 1;
                let interval = self.settings.long_break_interval.max(1);
                let next = if self.completed % interval == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                };
                (next, self.settings.auto_start_breaks)
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => {
                (TimerMode::Pomodoro, self.settings.auto_start_pomodoros)
            }
        };

        self.switch_mode(next_mode);
        if auto_start {
            self.start();
        }

        Completion {
            finished,
            next_mode,
            auto_start,
        }
    }

    /// Elapsed fraction of the current session, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        f64::from(self.total - self.remaining.min(self.total)) / f64::from(self.total)
    }

    /// Remaining time as `mm:ss`
    pub fn format_time(&self) -> String {
        format_clock(self.remaining)
    }
}

/// Format seconds as zero-padded `mm:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
