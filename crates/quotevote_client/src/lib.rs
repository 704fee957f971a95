//! Client-side quote collection logic for QuoteVote.
//!
//! [`QuoteController`] keeps the visible quote list in sync with the remote
//! store, [`Debouncer`] coalesces query edits, and [`backend`] runs both on a
//! single-threaded worker that a UI drives with commands.

/// Login, registration, and logout flows.
pub mod auth;
/// Command/event worker owning the controller.
pub mod backend;
/// Quote collection controller.
pub mod controller;
/// Cancellable delayed delivery of the latest value.
pub mod debounce;
/// reqwest-backed remote store.
pub mod http;
/// Remote store contract and transport error classification.
pub mod remote;

pub use controller::QuoteController;
pub use debounce::Debouncer;
pub use http::HttpQuoteStore;
pub use quotevote_core as core;
pub use remote::{QuoteRemote, StoreError};
