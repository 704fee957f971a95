//! Quote collection controller.
//!
//! Owns the visible collection and its leaderboard. Every successful vote,
//! create, or update re-runs the current search so counts and ordering come
//! from the server; a confirmed delete removes the quote locally instead.

use crate::remote::{QuoteRemote, StoreError};
use quotevote_core::error::RemoteAction;
use quotevote_core::text::require_quote_text;
use quotevote_core::{top_quotes, ClientError, QueryState, Quote, QuoteId, SessionStore};
use std::sync::Arc;
use tracing::{info, warn};

pub struct QuoteController<R> {
    remote: R,
    session: Arc<dyn SessionStore>,
    query: QueryState,
    quotes: Vec<Quote>,
    leaderboard: Vec<Quote>,
    loading: bool,
    last_error: Option<String>,
}

impl<R: QuoteRemote> QuoteController<R> {
    /// Create a controller with an empty collection and the default query.
    pub fn new(remote: R, session: Arc<dyn SessionStore>) -> Self {
        Self {
            remote,
            session,
            query: QueryState::default(),
            quotes: Vec::new(),
            leaderboard: Vec::new(),
            loading: false,
            last_error: None,
        }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn leaderboard(&self) -> &[Quote] {
        &self.leaderboard
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Whether a search request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the most recent failed search, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn credential(&self) -> Result<String, ClientError> {
        self.session.token().ok_or(ClientError::Unauthenticated)
    }

    /// Map a store failure to the user-facing taxonomy.
    ///
    /// A rejected credential is cleared before `SessionExpired` is returned.
    fn classify(&self, action: RemoteAction, err: StoreError) -> ClientError {
        match err {
            StoreError::Unauthorized => {
                warn!(action = %action, "credential rejected; clearing session");
                if let Err(clear_err) = self.session.clear() {
                    warn!("failed to clear session: {}", clear_err);
                }
                ClientError::SessionExpired
            }
            other => {
                warn!(action = %action, "remote failure: {}", other);
                ClientError::remote(action, other.to_string())
            }
        }
    }

    fn replace_collection(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.leaderboard = top_quotes(&self.quotes);
    }

    /// Fetch the collection for `state` and make it the current query.
    ///
    /// # Errors
    /// - [`ClientError::Unauthenticated`] without a stored credential.
    /// - [`ClientError::SessionExpired`] when the server rejects it.
    /// - [`ClientError::Remote`] for any other failure; the collection is kept.
    pub async fn search(&mut self, state: QueryState) -> Result<&[Quote], ClientError> {
        self.query = state;
        self.loading = true;
        let outcome = self.fetch_current().await;
        self.loading = false;
        match outcome {
            Ok(quotes) => {
                self.last_error = None;
                self.replace_collection(quotes);
                Ok(self.quotes.as_slice())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn fetch_current(&self) -> Result<Vec<Quote>, ClientError> {
        let token = self.credential()?;
        self.remote
            .search(&token, &self.query)
            .await
            .map_err(|err| self.classify(RemoteAction::Search, err))
    }

    /// Re-run the search for the current query.
    pub async fn refresh(&mut self) -> Result<&[Quote], ClientError> {
        let state = self.query.clone();
        self.search(state).await
    }

    /// Vote for `id`, then reload counts from the server.
    ///
    /// The local vote count is never incremented.
    pub async fn vote(&mut self, id: QuoteId) -> Result<&[Quote], ClientError> {
        let token = self.credential()?;
        self.remote
            .vote(&token, id)
            .await
            .map_err(|err| self.classify(RemoteAction::Vote, err))?;
        info!(quote_id = id, "vote recorded");
        self.refresh().await
    }

    /// Create a quote, then reload the collection.
    ///
    /// Blank text is rejected without a request and leaves the collection
    /// untouched.
    pub async fn create(&mut self, text: &str) -> Result<&[Quote], ClientError> {
        let text = require_quote_text(text)?;
        let token = self.credential()?;
        self.remote
            .create(&token, text)
            .await
            .map_err(|err| self.classify(RemoteAction::Create, err))?;
        info!("quote created");
        self.refresh().await
    }

    /// Check that `id` may be edited and return its current text.
    ///
    /// This is the caller-side precondition of [`Self::update`]: quotes with
    /// votes are immutable.
    pub fn begin_edit(&self, id: QuoteId) -> Result<String, ClientError> {
        let quote = self
            .quotes
            .iter()
            .find(|quote| quote.id == id)
            .ok_or_else(|| ClientError::validation("Quote not found"))?;
        if !quote.is_editable() {
            return Err(ClientError::validation("Cannot edit a quote that has votes"));
        }
        Ok(quote.text.clone())
    }

    /// Replace the text of `id`, then reload the collection.
    ///
    /// The caller must have checked [`Self::begin_edit`]; the vote count is
    /// not re-verified here and the server remains the authority.
    pub async fn update(&mut self, id: QuoteId, text: &str) -> Result<&[Quote], ClientError> {
        let text = require_quote_text(text)?;
        let token = self.credential()?;
        self.remote
            .update(&token, id, text)
            .await
            .map_err(|err| self.classify(RemoteAction::Update, err))?;
        info!(quote_id = id, "quote updated");
        self.refresh().await
    }

    /// Delete `id` remotely and drop it from the local collection.
    ///
    /// No re-fetch is issued.
    pub async fn delete(&mut self, id: QuoteId) -> Result<&[Quote], ClientError> {
        let token = self.credential()?;
        self.remote
            .delete(&token, id)
            .await
            .map_err(|err| self.classify(RemoteAction::Delete, err))?;
        info!(quote_id = id, "quote deleted");
        let remaining: Vec<Quote> = std::mem::take(&mut self.quotes)
            .into_iter()
            .filter(|quote| quote.id != id)
            .collect();
        self.replace_collection(remaining);
        Ok(self.quotes.as_slice())
    }

    /// Clear the credential and cached identity. No request is sent.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session.clear()
    }
}
