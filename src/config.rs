//! Configuration for flowstate.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (FLOWSTATE_HOME, TMDB_API_KEY, RAWG_API_KEY,
//!    GAMEZOP_PARTNER_ID, DEEZER_BASE_URL)
//! 2. Config file (.flowstate/config.yaml)
//! 3. Defaults (~/.flowstate, public provider endpoints)
//!
//! Config file discovery:
//! - Searches current directory and parents for .flowstate/config.yaml
//! - `paths.home` is relative to the .flowstate/ directory

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::adapters::{deezer, gamezop, rawg, tmdb};
use crate::adapters::{DeezerConfig, GamezopConfig, RawgConfig, TmdbConfig};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Provider configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{provider} API key is not configured (set {env_var} or providers.{provider}.api_key)")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("Invalid {provider} base URL '{url}': {reason}")]
    InvalidBaseUrl {
        provider: &'static str,
        url: String,
        reason: String,
    },
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory holding storage.json (relative to .flowstate/)
    pub home: Option<String>,
    /// Default output directory for `flowstate site`
    pub site: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub deezer: ProviderSection,
    #[serde(default)]
    pub tmdb: ProviderSection,
    #[serde(default)]
    pub rawg: ProviderSection,
    #[serde(default)]
    pub gamezop: ProviderSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub partner_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths and provider settings
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the flowstate home (storage)
    pub home: PathBuf,
    /// Default site output directory
    pub site_dir: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Per-request timeout
    pub timeout: Duration,

    pub deezer_base_url: String,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub rawg_api_key: Option<String>,
    pub rawg_base_url: String,
    pub gamezop_partner_id: Option<String>,
    pub gamezop_base_url: String,
}

impl ResolvedConfig {
    pub fn deezer(&self) -> DeezerConfig {
        DeezerConfig {
            base_url: self.deezer_base_url.clone(),
            timeout: self.timeout,
        }
    }

    pub fn tmdb(&self) -> TmdbConfig {
        TmdbConfig {
            api_key: self.tmdb_api_key.clone(),
            base_url: self.tmdb_base_url.clone(),
            image_base_url: tmdb::DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout: self.timeout,
        }
    }

    pub fn rawg(&self) -> RawgConfig {
        RawgConfig {
            api_key: self.rawg_api_key.clone(),
            base_url: self.rawg_base_url.clone(),
            timeout: self.timeout,
        }
    }

    pub fn gamezop(&self) -> GamezopConfig {
        GamezopConfig {
            partner_id: self.gamezop_partner_id.clone(),
            base_url: self.gamezop_base_url.clone(),
            timeout: self.timeout,
        }
    }

    /// Path of the key/value storage file
    pub fn storage_path(&self) -> PathBuf {
        self.home.join("storage.json")
    }
}

/// Find config file by searching a directory and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".flowstate").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Merge env, file and defaults.
///
/// `env` is injected so precedence can be tested without touching the
/// process environment.
fn resolve(
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
    default_home: PathBuf,
) -> ResolvedConfig {
    let (config_file, file) = match file {
        Some((path, file)) => (Some(path), file),
        None => (None, ConfigFile::default()),
    };
    let flowstate_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    let home = if let Some(env_home) = non_empty(env("FLOWSTATE_HOME")) {
        PathBuf::from(env_home)
    } else if let (Some(dir), Some(home)) = (&flowstate_dir, &file.paths.home) {
        resolve_path(dir, home)
    } else {
        default_home
    };

    let site_dir = match (&flowstate_dir, &file.paths.site) {
        (Some(dir), Some(site)) => resolve_path(dir, site),
        _ => home.join("site"),
    };

    let providers = file.providers;
    let pick = |var: &str, from_file: Option<String>| non_empty(env(var)).or(non_empty(from_file));

    ResolvedConfig {
        site_dir,
        config_file,
        timeout: Duration::from_secs(
            file.http
                .and_then(|h| h.timeout_seconds)
                .unwrap_or(crate::adapters::DEFAULT_TIMEOUT.as_secs()),
        ),
        deezer_base_url: pick("DEEZER_BASE_URL", providers.deezer.base_url)
            .unwrap_or_else(|| deezer::DEFAULT_BASE_URL.to_string()),
        tmdb_api_key: pick("TMDB_API_KEY", providers.tmdb.api_key),
        tmdb_base_url: non_empty(providers.tmdb.base_url)
            .unwrap_or_else(|| tmdb::DEFAULT_BASE_URL.to_string()),
        rawg_api_key: pick("RAWG_API_KEY", providers.rawg.api_key),
        rawg_base_url: non_empty(providers.rawg.base_url)
            .unwrap_or_else(|| rawg::DEFAULT_BASE_URL.to_string()),
        gamezop_partner_id: pick("GAMEZOP_PARTNER_ID", providers.gamezop.partner_id),
        gamezop_base_url: non_empty(providers.gamezop.base_url)
            .unwrap_or_else(|| gamezop::DEFAULT_BASE_URL.to_string()),
        home,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".flowstate");

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let file = match find_config_file(&cwd) {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };

    Ok(resolve(file, |var| std::env::var(var).ok(), default_home))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, env_from(&[]), PathBuf::from("/u/.flowstate"));

        assert_eq!(config.home, PathBuf::from("/u/.flowstate"));
        assert_eq!(config.storage_path(), PathBuf::from("/u/.flowstate/storage.json"));
        assert_eq!(config.site_dir, PathBuf::from("/u/.flowstate/site"));
        assert_eq!(config.deezer_base_url, "https://api.deezer.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.tmdb_api_key.is_none());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".flowstate");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1"
paths:
  home: ./state
providers:
  tmdb:
    api_key: file-key
  deezer:
    base_url: http://localhost:8080/deezer
http:
  timeout_seconds: 3
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.providers.tmdb.api_key.as_deref(), Some("file-key"));

        let config = resolve(
            Some((config_path.clone(), parsed)),
            env_from(&[]),
            PathBuf::from("/u/.flowstate"),
        );
        assert_eq!(config.home, dir.join("state"));
        assert_eq!(config.tmdb_api_key.as_deref(), Some("file-key"));
        assert_eq!(config.deezer_base_url, "http://localhost:8080/deezer");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = ConfigFile::default();
        file.providers.rawg.api_key = Some("file-key".to_string());

        let config = resolve(
            Some((PathBuf::from("/p/.flowstate/config.yaml"), file)),
            env_from(&[("RAWG_API_KEY", "env-key"), ("FLOWSTATE_HOME", "/tmp/fs")]),
            PathBuf::from("/u/.flowstate"),
        );
        assert_eq!(config.rawg_api_key.as_deref(), Some("env-key"));
        assert_eq!(config.home, PathBuf::from("/tmp/fs"));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = resolve(None, env_from(&[("TMDB_API_KEY", "  ")]), PathBuf::from("/u"));
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".flowstate");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "version: \"1\"\n").unwrap();

        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(dir.join("config.yaml")));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
