//! Core domain library for QuoteVote (config, models, session, leaderboard).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Process-global environment mutation helpers.
pub mod env;
/// User-facing error taxonomy.
pub mod error;
/// Top-N projection over the visible quote collection.
pub mod leaderboard;
/// Data models for quotes, queries, and authentication payloads.
pub mod models;
/// Credential/session storage.
pub mod session;
/// Text normalization and password policy helpers.
pub mod text;

pub use config::Config;
pub use constants::*;
pub use error::ClientError;
pub use leaderboard::top_quotes;
pub use models::quote::{QueryState, Quote, QuoteFilter, QuoteId, SortDirection};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
