//! Data models for the quote API and authentication payloads.

/// Login and registration payloads.
pub mod auth;
/// Quote records, query state, and mutation payloads.
pub mod quote;
