//! Canonical paths for flowstate state.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! ```text
//! $FLOWSTATE_HOME/            (default ~/.flowstate)
//! ├── storage.json            # watchlist lists + pomodoroSettings
//! ├── storage.json.lock       # advisory write lock
//! └── site/                   # default `flowstate site` output
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Get the flowstate home directory
pub fn flowstate_home() -> Result<PathBuf> {
    Ok(crate::config::config()?.home.clone())
}

/// Get the storage file path ($FLOWSTATE_HOME/storage.json)
pub fn storage_file() -> Result<PathBuf> {
    Ok(crate::config::config()?.storage_path())
}

/// Get the default static site directory
pub fn site_dir() -> Result<PathBuf> {
    Ok(crate::config::config()?.site_dir.clone())
}

/// Lock file guarding writes to `storage`
pub fn lock_file_for(storage: &Path) -> PathBuf {
    let mut name = storage
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "storage.json".into());
    name.push(".lock");
    storage.with_file_name(name)
}

/// File name of a rendered hub page
pub fn hub_page_name(mood: crate::domain::Mood) -> String {
    format!("{}.html", mood)
}

/// File name of the rendered watchlist page
pub const WATCHLIST_PAGE: &str = "watchlist.html";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mood;

    #[test]
    fn test_lock_file_sits_next_to_storage() {
        assert_eq!(
            lock_file_for(Path::new("/x/.flowstate/storage.json")),
            PathBuf::from("/x/.flowstate/storage.json.lock")
        );
    }

    #[test]
    fn test_hub_page_name() {
        assert_eq!(hub_page_name(Mood::Creative), "creative.html");
    }
}
