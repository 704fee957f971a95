//! Remote store contract consumed by the controller and auth flows.

use quotevote_core::models::auth::{CredentialsRequest, LoginResponse};
use quotevote_core::{QueryState, Quote, QuoteId};
use std::future::Future;
use thiserror::Error;

/// Transport-level outcome of a failed remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// HTTP 401: the bearer credential was rejected.
    #[error("unauthorized")]
    Unauthorized,

    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response decode error: {0}")]
    Decode(String),
}

/// The quote service as seen by the client.
///
/// Authenticated calls take the bearer token explicitly; the caller owns
/// credential lookup.
pub trait QuoteRemote: Send + Sync {
    fn search(
        &self,
        token: &str,
        query: &QueryState,
    ) -> impl Future<Output = Result<Vec<Quote>, StoreError>> + Send;

    fn vote(&self, token: &str, id: QuoteId) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn create(&self, token: &str, text: &str)
        -> impl Future<Output = Result<(), StoreError>> + Send;

    fn update(
        &self,
        token: &str,
        id: QuoteId,
        text: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, token: &str, id: QuoteId)
        -> impl Future<Output = Result<(), StoreError>> + Send;

    fn login(
        &self,
        request: &CredentialsRequest,
    ) -> impl Future<Output = Result<LoginResponse, StoreError>> + Send;

    fn register(
        &self,
        request: &CredentialsRequest,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
