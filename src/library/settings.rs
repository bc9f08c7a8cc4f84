//! Persisted Pomodoro timer settings.

use tracing::info;

use super::storage::{Storage, StorageError};
use crate::core::TimerSettings;

/// Storage key shared with the website timer
pub const SETTINGS_KEY: &str = "pomodoroSettings";

/// Load saved settings; missing fields take their defaults
pub fn load_timer_settings(storage: &Storage) -> TimerSettings {
    storage.get(SETTINGS_KEY).unwrap_or_default()
}

pub fn save_timer_settings(
    storage: &Storage,
    settings: &TimerSettings,
) -> Result<(), StorageError> {
    storage.set(SETTINGS_KEY, settings)?;
    info!(
        pomodoro = settings.pomodoro,
        short_break = settings.short_break,
        long_break = settings.long_break,
        "Timer settings saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("storage.json"));
        assert_eq!(load_timer_settings(&storage), TimerSettings::default());
    }

    #[test]
    fn test_partial_settings_merge_over_defaults() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("storage.json"));
        std::fs::write(
            storage.path(),
            r#"{"pomodoroSettings": {"pomodoro": 50, "autoStartBreaks": true}}"#,
        )
        .unwrap();

        let settings = load_timer_settings(&storage);
        assert_eq!(settings.pomodoro, 50);
        assert!(settings.auto_start_breaks);
        assert_eq!(settings.short_break, 5);
        assert_eq!(settings.long_break_interval, 4);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path().join("storage.json"));
        let settings = TimerSettings {
            long_break: 20,
            ..TimerSettings::default()
        };
        save_timer_settings(&storage, &settings).unwrap();
        assert_eq!(load_timer_settings(&storage).long_break, 20);
    }
}
