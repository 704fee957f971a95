//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCH_DEBOUNCE, DEFAULT_SERVER_URL, SESSION_FILE_NAME,
};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the QuoteVote client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_url: String,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
    pub session_path: PathBuf,
    pub log_timing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_path: default_session_path(),
            log_timing: false,
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_session_path() -> PathBuf {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("quotevote")
        .join(SESSION_FILE_NAME)
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_url: env::var("QV_SERVER")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.server_url),
            search_debounce: env_u64("QV_SEARCH_DEBOUNCE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            request_timeout: env_u64("QV_REQUEST_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            session_path: env::var("QV_SESSION_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| PathBuf::from(expand_tilde(value)))
                .unwrap_or(defaults.session_path),
            log_timing: env_flag_enabled("QV_LOG_TIMING"),
        }
    }
}
