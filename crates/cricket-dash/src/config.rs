// Configuration loading and validation (config/dashboard.toml).

use std::path::{Path, PathBuf};

use cricket_core::loader::DataPaths;
use serde::Deserialize;
use thiserror::Error;

/// Log filter used when neither `RUST_LOG` nor `[logging] filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "cricket_dash=info,cricket_core=info,warn";

const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    dashboard: DashboardSection,
    server: ServerConfig,
    data_paths: DataPaths,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DashboardSection {
    title: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct LoggingSection {
    filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The assembled, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub server: ServerConfig,
    pub data_paths: DataPaths,
    pub log_filter: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/dashboard.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        title: file.dashboard.title,
        server: file.server,
        data_paths: file.data_paths,
        log_filter: file
            .logging
            .filter
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
    };

    validate(&config)?;

    Ok(config)
}

fn copy_error(path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::DefaultsCopyError {
        message: format!("{}: {e}", path.display()),
    }
}

/// Regular files in `defaults/`, sorted, excluding `*.example` templates.
fn default_files(defaults_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(defaults_dir).map_err(|e| copy_error(defaults_dir, e))? {
        let path = entry.map_err(|e| copy_error(defaults_dir, e))?.path();
        let template = path.extension().is_some_and(|ext| ext == "example");
        if path.is_file() && !template {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Copy `source` to `target` unless `target` already exists. Returns whether
/// a copy happened.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error(target, e)),
    };
    let mut src = std::fs::File::open(source).map_err(|e| copy_error(source, e))?;
    std::io::copy(&mut src, &mut dest).map_err(|e| copy_error(target, e))?;
    Ok(true)
}

/// Seed `config/` from `defaults/`, never overwriting an edited file.
/// Returns the files that were created.
///
/// A `config/` directory on its own is enough: installs without shipped
/// defaults run from whatever is already there.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no defaults/ or config/ directory in {}; run from the cricket-dash directory",
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| copy_error(&config_dir, e))?;

    let mut copied = Vec::new();
    for source in default_files(&defaults_dir)? {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if copy_if_missing(&source, &target)? {
            copied.push(target);
        }
    }
    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: field.to_string(),
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    require_non_empty("dashboard.title", &config.title)?;
    require_non_empty("server.host", &config.server.host)?;

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    let paths = &config.data_paths;
    for (field, value) in [
        ("data_paths.matches", &paths.matches),
        ("data_paths.batting", &paths.batting),
        ("data_paths.bowling", &paths.bowling),
    ] {
        require_non_empty(field, value)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
