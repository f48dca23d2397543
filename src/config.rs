//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--no-storage`, `--no-mouse`, positional workspace)
//! 2. `--config <file>`
//! 3. `$NOTEBENCH_CONFIG` environment variable (path to config file)
//! 4. Project-local `.notebench.toml` in the current working directory
//! 5. Global `~/.config/notebench/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::autosave::{DEFAULT_DELAY, DEFAULT_INDICATOR};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Workspace opened at startup (overridden by CLI positional arg).
    pub workspace: Option<String>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Storage capability settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// `false` runs against the no-op storage stub.
    pub enabled: Option<bool>,
}

/// Note autosave timing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AutoSaveConfig {
    pub delay_ms: Option<u64>,
    pub indicator_ms: Option<u64>,
}

/// New-note settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NotesConfig {
    /// chrono format string for the "Created:" line of new notes.
    pub date_locale_format: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub autosave: AutoSaveConfig,
    pub notes: NotesConfig,
}

/// Default date format of the "Created:" line.
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("NOTEBENCH_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".notebench.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("notebench").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a logged warning).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "config file loaded");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `Some` values in `other` win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                workspace: other.general.workspace.clone().or(self.general.workspace),
                mouse: other.general.mouse.or(self.general.mouse),
            },
            storage: StorageConfig {
                enabled: other.storage.enabled.or(self.storage.enabled),
            },
            autosave: AutoSaveConfig {
                delay_ms: other.autosave.delay_ms.or(self.autosave.delay_ms),
                indicator_ms: other.autosave.indicator_ms.or(self.autosave.indicator_ms),
            },
            notes: NotesConfig {
                date_locale_format: other
                    .notes
                    .date_locale_format
                    .clone()
                    .or(self.notes.date_locale_format),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            match load_file(cli_path) {
                Some(file_cfg) => config = config.merge(&file_cfg),
                None => tracing::warn!(path = %cli_path.display(), "--config file not usable"),
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn workspace(&self) -> Option<PathBuf> {
        self.general.workspace.as_deref().map(PathBuf::from)
    }

    /// Whether mouse support is enabled.
    pub fn mouse_enabled(&self) -> bool {
        self.general.mouse.unwrap_or(true)
    }

    /// Whether the real filesystem backend is used.
    pub fn storage_enabled(&self) -> bool {
        self.storage.enabled.unwrap_or(true)
    }

    pub fn autosave_delay(&self) -> Duration {
        self.autosave
            .delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DELAY)
    }

    pub fn indicator_duration(&self) -> Duration {
        self.autosave
            .indicator_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_INDICATOR)
    }

    pub fn date_format(&self) -> &str {
        self.notes
            .date_locale_format
            .as_deref()
            .unwrap_or(DEFAULT_DATE_FORMAT)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
