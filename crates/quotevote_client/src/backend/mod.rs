//! Backend worker wiring.
//!
//! The worker owns a [`crate::QuoteController`] on a dedicated thread with a
//! single-threaded runtime. The UI sends [`CoreCmd`]s and polls
//! [`CoreEvent`]s; query edits go through a [`crate::Debouncer`].

mod protocol;
mod worker;

pub use protocol::{CoreCmd, CoreEvent};
pub use worker::{spawn_backend, BackendHandle};
