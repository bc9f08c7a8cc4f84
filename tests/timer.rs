//! Timer Integration Tests
//!
//! Tests for persisted settings driving a full Pomodoro cycle.

use flowstate::core::{PomodoroTimer, TimerMode, TimerSettings, MAX_MINUTES};
use flowstate::library::{load_timer_settings, save_timer_settings, Storage};
use tempfile::TempDir;

fn run_to_completion(timer: &mut PomodoroTimer) -> flowstate::core::Completion {
    timer.start();
    loop {
        if let Some(done) = timer.tick() {
            return done;
        }
    }
}

#[test]
fn test_saved_settings_drive_the_cycle() {
    let dir = TempDir::new().unwrap();
    let storage = Storage::open(dir.path().join("storage.json"));
    let settings = TimerSettings {
        pomodoro: 1,
        short_break: 1,
        long_break: 2,
        long_break_interval: 2,
        ..Default::default()
    };
    save_timer_settings(&storage, &settings).unwrap();

    let mut timer = PomodoroTimer::new(load_timer_settings(&storage));
    assert_eq!(timer.format_time(), "01:00");

    let done = run_to_completion(&mut timer);
    assert_eq!(done.next_mode, TimerMode::ShortBreak);
    assert!(!done.auto_start);
    assert!(!timer.is_running());

    let done = run_to_completion(&mut timer);
    assert_eq!(done.next_mode, TimerMode::Pomodoro);

    let done = run_to_completion(&mut timer);
    assert_eq!(done.next_mode, TimerMode::LongBreak);
    assert_eq!(timer.remaining_secs(), 120);
    assert_eq!(timer.pomodoros_completed(), 2);
}

#[test]
fn test_auto_start_keeps_running() {
    let settings = TimerSettings {
        pomodoro: 1,
        short_break: 1,
        auto_start_breaks: true,
        ..Default::default()
    };
    let mut timer = PomodoroTimer::new(settings);

    let done = run_to_completion(&mut timer);
    assert!(done.auto_start);
    assert!(timer.is_running());
    assert_eq!(timer.mode(), TimerMode::ShortBreak);
}

#[test]
fn test_settings_apply_resets_current_mode() {
    let mut timer = PomodoroTimer::new(TimerSettings::default());
    timer.start();
    timer.tick();
    assert_eq!(timer.format_time(), "24:59");

    timer.apply_settings(TimerSettings {
        pomodoro: 50,
        ..Default::default()
    });
    assert!(!timer.is_running());
    assert_eq!(timer.format_time(), "50:00");
}

#[test]
fn test_oversized_stored_length_is_clamped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, r#"{"pomodoroSettings": {"pomodoro": 4294967295}}"#).unwrap();

    let storage = Storage::open(path);
    let timer = PomodoroTimer::new(load_timer_settings(&storage));
    assert_eq!(timer.remaining_secs(), MAX_MINUTES * 60);
    assert_eq!(timer.mode(), TimerMode::Pomodoro);
}
