//! Shared constants used across QuoteVote crates.

use std::time::Duration;

/// Default base URL of the quote service.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Quiescence window applied to search/filter/sort changes before fetching.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Default request timeout for the HTTP client, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Number of entries kept by the leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// Minimum accepted username length at registration.
pub const MIN_USERNAME_LEN: usize = 6;

/// Minimum password strength score accepted at registration.
pub const MIN_REGISTER_PASSWORD_STRENGTH: u8 = 3;

/// File name of the persisted CLI session.
pub const SESSION_FILE_NAME: &str = "session.json";
