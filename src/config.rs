//! Configuration types.
//!
//! Everything is driven by environment variables. Each bot is optional and
//! enabled by the presence of its token; at least one bot must be configured.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Drive folder for testimonial uploads.
const DEFAULT_TESTIMONIALS_FOLDER: &str = "1TMehhfN9tExqoaHIYya-B-SCcFeBTj2y";
/// Default Drive folder for educational document uploads.
const DEFAULT_EDUCATION_FOLDER: &str = "1i9a2G7EXByrY9LxXtv4yY-CMExDWI7hM";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Registry (professional registration) bot, if its token is set.
    pub registry: Option<RegistryConfig>,
    /// Requests (client intake) bot, if its token is set.
    pub requests: Option<RequestsConfig>,
    /// Google service-account credentials source.
    pub credentials: CredentialsSource,
    /// Port for the liveness HTTP server.
    pub http_port: u16,
    /// Sessions idle longer than this are dropped.
    pub session_idle_timeout: Duration,
    /// Period of the RAM/CPU heartbeat log line.
    pub monitor_interval: Duration,
    /// File the tracing file layer appends to.
    pub log_file: PathBuf,
}

/// Registry bot configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub bot_token: SecretString,
    pub sheet: SheetConfig,
    /// Drive folder receiving testimonial uploads.
    pub testimonials_folder: String,
    /// Drive folder receiving educational document uploads.
    pub education_folder: String,
}

/// Requests bot configuration.
#[derive(Debug, Clone)]
pub struct RequestsConfig {
    pub bot_token: SecretString,
    pub sheet: SheetConfig,
}

/// Addressing for one worksheet.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    /// Worksheet title, used in A1 range references.
    pub worksheet: String,
    /// Numeric grid id of the worksheet, needed for row deletion.
    pub grid_id: i64,
}

/// Where the service-account key comes from.
#[derive(Debug, Clone)]
pub enum CredentialsSource {
    /// Raw key JSON held in an environment variable.
    Json(SecretString),
    /// Path to a key JSON file.
    File(PathBuf),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let registry = match std::env::var("DEBO_REGISTRY_BOT_TOKEN") {
            Ok(token) => Some(RegistryConfig {
                bot_token: SecretString::from(token),
                sheet: SheetConfig {
                    spreadsheet_id: require_env("DEBO_REGISTRY_SPREADSHEET_ID")?,
                    worksheet: env_or("DEBO_REGISTRY_WORKSHEET", "Sheet1"),
                    grid_id: parse_i64(
                        "DEBO_REGISTRY_SHEET_GID",
                        env_opt("DEBO_REGISTRY_SHEET_GID"),
                        0,
                    )?,
                },
                testimonials_folder: env_or(
                    "DEBO_TESTIMONIALS_FOLDER_ID",
                    DEFAULT_TESTIMONIALS_FOLDER,
                ),
                education_folder: env_or("DEBO_EDUCATION_FOLDER_ID", DEFAULT_EDUCATION_FOLDER),
            }),
            Err(_) => None,
        };

        let requests = match std::env::var("DEBO_REQUESTS_BOT_TOKEN") {
            Ok(token) => Some(RequestsConfig {
                bot_token: SecretString::from(token),
                sheet: SheetConfig {
                    spreadsheet_id: require_env("DEBO_REQUESTS_SPREADSHEET_ID")?,
                    worksheet: env_or("DEBO_REQUESTS_WORKSHEET", "Sheet1"),
                    grid_id: parse_i64(
                        "DEBO_REQUESTS_SHEET_GID",
                        env_opt("DEBO_REQUESTS_SHEET_GID"),
                        0,
                    )?,
                },
            }),
            Err(_) => None,
        };

        if registry.is_none() && requests.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "DEBO_REGISTRY_BOT_TOKEN or DEBO_REQUESTS_BOT_TOKEN".to_string(),
            ));
        }

        let credentials = match env_opt("DEBO_GOOGLE_CREDENTIALS_JSON") {
            Some(json) => CredentialsSource::Json(SecretString::from(json)),
            None => match env_opt("DEBO_GOOGLE_CREDENTIALS_FILE") {
                Some(path) => CredentialsSource::File(PathBuf::from(path)),
                None => {
                    return Err(ConfigError::MissingEnvVar(
                        "DEBO_GOOGLE_CREDENTIALS_JSON or DEBO_GOOGLE_CREDENTIALS_FILE".to_string(),
                    ));
                }
            },
        };

        Ok(Self {
            registry,
            requests,
            credentials,
            http_port: parse_port(env_opt("PORT"), 8000)?,
            session_idle_timeout: Duration::from_secs(parse_u64(
                "DEBO_SESSION_IDLE_SECS",
                env_opt("DEBO_SESSION_IDLE_SECS"),
                3600,
            )?),
            monitor_interval: Duration::from_secs(parse_u64(
                "DEBO_MONITOR_INTERVAL_SECS",
                env_opt("DEBO_MONITOR_INTERVAL_SECS"),
                10,
            )?),
            log_file: PathBuf::from(env_or("DEBO_LOG_FILE", "log.txt")),
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    env_opt(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_port(value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
            key: "PORT".to_string(),
            message: format!("not a port number: {v}"),
        }),
    }
}

fn parse_u64(key: &str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("not an integer: {v}"),
        }),
    }
}

fn parse_i64(key: &str, value: Option<String>, default: i64) -> Result<i64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("not an integer: {v}"),
        }),
    }
}
