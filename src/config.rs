//! Application configuration.
//!
//! File configuration is loaded from a TOML file at:
//! 1. `$EMLEXTRACT_CONFIG` (environment variable)
//! 2. `~/.config/emlextract/config.toml` (Linux/macOS)
//!    `%APPDATA%\emlextract\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! Command-line flags are merged on top and the result is frozen into an
//! [`ExtractConfig`] once at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default name of the per-message folder for colliding attachments.
pub const DEFAULT_DUPLICATES_DIR: &str = "duplicates";

/// Top-level file configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Extraction defaults.
    pub extract: ExtractSection,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override directory for the log file.
    pub log_dir: Option<PathBuf>,
}

/// Extraction defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Output root used when `--destination` is not given.
    pub default_destination: Option<PathBuf>,
    /// Name of the folder that receives colliding attachments.
    pub duplicates_dir: String,
    /// Skip a colliding attachment when it is byte-identical to the existing file.
    pub skip_identical: bool,
    /// Exit non-zero when any message or attachment failed.
    pub strict: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_dir: None,
        }
    }
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            default_destination: None,
            duplicates_dir: DEFAULT_DUPLICATES_DIR.to_string(),
            skip_identical: false,
            strict: false,
        }
    }
}

/// Resolved settings handed to the [`Extractor`](crate::extract::Extractor).
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Root under which per-subject folders are created.
    pub destination: PathBuf,
    /// Folder name (inside each message folder) for colliding attachments.
    pub duplicates_dir: String,
    /// Skip writing a duplicate whose content equals the primary file.
    pub skip_identical: bool,
}

impl ExtractConfig {
    /// Settings with default behavior writing into `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            duplicates_dir: DEFAULT_DUPLICATES_DIR.to_string(),
            skip_identical: false,
        }
    }

    /// Combine file configuration with an explicit destination (if any).
    ///
    /// Falls back to `default_destination` from the file, then to `cwd`.
    pub fn resolve(config: &Config, destination: Option<&Path>, cwd: &Path) -> Self {
        let destination = destination
            .map(Path::to_path_buf)
            .or_else(|| config.extract.default_destination.clone())
            .unwrap_or_else(|| cwd.to_path_buf());

        let duplicates_dir = if config.extract.duplicates_dir.trim().is_empty() {
            DEFAULT_DUPLICATES_DIR.to_string()
        } else {
            crate::extract::sanitize::sanitize(&config.extract.duplicates_dir)
        };

        Self {
            destination,
            duplicates_dir,
            skip_identical: config.extract.skip_identical,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("EMLEXTRACT_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("emlextract").join("config.toml"))
}

/// Return the directory that holds the log file.
pub fn log_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.log_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("emlextract")
}
