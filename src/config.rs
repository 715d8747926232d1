//! Runtime configuration resolved from the environment.
//!
//! Values come from (highest precedence first) command-line flags applied by
//! the binary, `NOTEJAR_*` environment variables (including a `.env` file
//! loaded by the binary), then built-in defaults.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable overriding the notes file location.
pub const DB_ENV: &str = "NOTEJAR_DB";
/// Environment variable overriding the HTML template location.
pub const TEMPLATE_ENV: &str = "NOTEJAR_TEMPLATE";
/// Environment variable overriding the web server bind host.
pub const HOST_ENV: &str = "NOTEJAR_HOST";
/// Environment variable overriding the default web server port.
pub const PORT_ENV: &str = "NOTEJAR_PORT";

const APP_DIR_NAME: &str = "notejar";
const DATABASE_FILE_NAME: &str = "db.json";
const TEMPLATE_FILE_NAME: &str = "template.html";

/// Port used by `notejar web` when none is given.
pub const DEFAULT_PORT: u16 = 5000;
/// Host the web server binds to by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid NOTEJAR_PORT value '{value}': expected a port number")]
    InvalidPort { value: String },
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the JSON notes file.
    pub database_path: PathBuf,
    /// Location of the HTML template served by the web viewer.
    pub template_path: PathBuf,
    /// Host the web viewer binds to.
    pub host: String,
    /// Port the web viewer binds to when none is given on the command line.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        let app_dir = default_app_dir();
        Self {
            database_path: app_dir.join(DATABASE_FILE_NAME),
            template_path: app_dir.join(TEMPLATE_FILE_NAME),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Builds the configuration from `NOTEJAR_*` variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `NOTEJAR_PORT` is set but is not a valid port.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_empty_var(DB_ENV) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(path) = non_empty_var(TEMPLATE_ENV) {
            config.template_path = PathBuf::from(path);
        }
        if let Some(host) = non_empty_var(HOST_ENV) {
            config.host = host;
        }
        if let Some(port) = non_empty_var(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value: port })?;
        }

        Ok(config)
    }
}

/// Gets the per-user application directory.
///
/// Returns `{data_dir}/notejar` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// Falls back to the current directory when no data directory is known.
pub fn default_app_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
