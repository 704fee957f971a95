//! Login, registration, and logout flows against the session store.

use crate::remote::{QuoteRemote, StoreError};
use quotevote_core::error::RemoteAction;
use quotevote_core::models::auth::CredentialsRequest;
use quotevote_core::text::{validate_login, validate_registration};
use quotevote_core::{ClientError, Session, SessionStore};
use tracing::{info, warn};

fn remote_failure(action: RemoteAction, err: StoreError) -> ClientError {
    warn!(action = %action, "auth request failed: {}", err);
    ClientError::remote(action, err.to_string())
}

/// Authenticate and store the returned credential and identity.
///
/// # Errors
/// - [`ClientError::Validation`] when either field is blank (no request).
/// - [`ClientError::Remote`] with "Invalid username or password" for any
///   failed request, including 401.
pub async fn login<R: QuoteRemote>(
    remote: &R,
    session: &dyn SessionStore,
    username: &str,
    password: &str,
) -> Result<Session, ClientError> {
    validate_login(username, password)?;
    let response = remote
        .login(&CredentialsRequest::new(username, password))
        .await
        .map_err(|err| remote_failure(RemoteAction::Login, err))?;
    let stored = Session::new(response.token, response.username, response.role);
    session.set(stored.clone())?;
    info!(username = %stored.username, "logged in");
    Ok(stored)
}

/// Create an account. Does not log in.
///
/// # Errors
/// - [`ClientError::Validation`] when the username is shorter than six
///   characters or the password fields are missing, mismatched, or weak.
/// - [`ClientError::Remote`] with "Registration failed." otherwise.
pub async fn register<R: QuoteRemote>(
    remote: &R,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ClientError> {
    validate_registration(username, password, confirm)?;
    remote
        .register(&CredentialsRequest::new(username, password))
        .await
        .map_err(|err| remote_failure(RemoteAction::Register, err))?;
    info!(username = %username, "registered");
    Ok(())
}

/// Clear the credential and identity attributes. No request is sent.
pub fn logout(session: &dyn SessionStore) -> Result<(), ClientError> {
    session.clear()?;
    info!("logged out");
    Ok(())
}
