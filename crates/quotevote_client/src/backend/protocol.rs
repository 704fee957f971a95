//! Protocol types for the quote backend worker.

use quotevote_core::{Quote, QuoteFilter, QuoteId, SortDirection};

/// Commands issued by the UI for the backend worker to execute.
#[derive(Debug, Clone)]
pub enum CoreCmd {
    /// Change the search term; fetch after the debounce window.
    SetSearch(String),
    /// Change the vote filter; fetch after the debounce window.
    SetFilter(QuoteFilter),
    /// Change the sort direction; fetch after the debounce window.
    SetSort(SortDirection),
    /// Flip the sort direction; fetch after the debounce window.
    ToggleSort,
    /// Fetch the current query immediately, dropping any pending debounced fetch.
    Refresh,
    Vote { id: QuoteId },
    Create { text: String },
    /// Ask to edit `id`; answered with `EditReady` or an `Error`.
    BeginEdit { id: QuoteId },
    Update { id: QuoteId, text: String },
    Delete { id: QuoteId },
    Logout,
}

/// Events produced by the backend worker and polled by the UI.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    /// A search request was sent.
    Loading,
    /// The collection was replaced by a fresh search result.
    QuotesLoaded {
        items: Vec<Quote>,
        leaderboard: Vec<Quote>,
    },
    /// The quote may be edited; `text` is its current content.
    EditReady { id: QuoteId, text: String },
    /// The quote was deleted and removed locally without a re-fetch.
    QuoteDeleted {
        id: QuoteId,
        items: Vec<Quote>,
        leaderboard: Vec<Quote>,
    },
    LoggedOut,
    /// A search found no usable credential; the UI must return to login.
    LoginRequired { message: String },
    /// A user action failed; `message` is ready for display.
    Error { message: String },
}
