// logsnap - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolve the platform-appropriate configuration directory.
///
/// Falls back to the current directory if platform dirs cannot be
/// determined.
pub fn config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
        let dir = proj_dirs.config_dir().to_path_buf();
        tracing::debug!(config = %dir.display(), "Platform config directory resolved");
        dir
    } else {
        tracing::warn!("Could not determine platform directories, using current directory");
        PathBuf::from(".")
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[store]` section.
    pub store: StoreSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[store]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Log files to query instead of the platform defaults.
    pub log_paths: Option<Vec<String>>,
    /// Maximum entries per retrieved snapshot.
    pub max_snapshot_entries: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time. Invalid
/// values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Log files queried by the system store.
    pub log_paths: Vec<PathBuf>,

    /// Maximum entries per retrieved snapshot.
    pub max_snapshot_entries: usize,

    /// Logging level string (read before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_paths: constants::DEFAULT_SYSLOG_PATHS
                .iter()
                .map(PathBuf::from)
                .collect(),
            max_snapshot_entries: constants::DEFAULT_MAX_SNAPSHOT_ENTRIES,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first-run). If the file is unparseable, returns defaults with a warning
/// -- the application still runs but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Store: log_paths --
    if let Some(ref paths) = raw.store.log_paths {
        if paths.is_empty() {
            warnings.push(
                "[store] log_paths is empty. Using platform defaults.".to_string(),
            );
        } else {
            config.log_paths = paths.iter().map(PathBuf::from).collect();
        }
    }

    // -- Store: max_snapshot_entries --
    if let Some(max) = raw.store.max_snapshot_entries {
        if (constants::MIN_MAX_SNAPSHOT_ENTRIES..=constants::ABSOLUTE_MAX_SNAPSHOT_ENTRIES)
            .contains(&max)
        {
            config.max_snapshot_entries = max;
        } else {
            warnings.push(format!(
                "[store] max_snapshot_entries = {max} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_SNAPSHOT_ENTRIES,
                constants::ABSOLUTE_MAX_SNAPSHOT_ENTRIES,
                constants::DEFAULT_MAX_SNAPSHOT_ENTRIES,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}
