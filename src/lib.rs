//! Root crate facade for the QuoteVote client.

pub use quotevote_client::{
    auth, backend, controller, debounce, http, remote, Debouncer, HttpQuoteStore, QuoteController,
    QuoteRemote, StoreError,
};
pub use quotevote_core::{
    config, constants, error, leaderboard, models, session, text, top_quotes, ClientError, Config,
    FileSessionStore, MemorySessionStore, QueryState, Quote, QuoteFilter, QuoteId, Session,
    SessionStore, SortDirection,
};
