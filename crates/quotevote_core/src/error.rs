//! User-facing error taxonomy for client operations.
use std::fmt;
use thiserror::Error;

/// Remote operation a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    Search,
    Vote,
    Create,
    Update,
    Delete,
    Login,
    Register,
}

impl RemoteAction {
    /// Message shown to the user when this action fails remotely.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Search => "Failed to fetch quotes.",
            Self::Vote => "Failed to vote.",
            Self::Create => "Failed to create quote",
            Self::Update => "Failed to update quote",
            Self::Delete => "Failed to delete quote",
            Self::Login => "Invalid username or password",
            Self::Register => "Registration failed.",
        }
    }
}

impl fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Search => "search",
            Self::Vote => "vote",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Login => "login",
            Self::Register => "register",
        };
        f.write_str(label)
    }
}

/// Errors surfaced to the user by controller and auth operations.
///
/// `Display` renders the exact message the UI should show.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No credential is stored; detected locally, never reaches the network.
    #[error("Please log in first.")]
    Unauthenticated,

    /// The server rejected the stored credential; it has been cleared.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Any other non-success response or transport failure.
    #[error("{}", action.failure_message())]
    Remote { action: RemoteAction, detail: String },

    /// Input rejected locally before any request was issued.
    #[error("{0}")]
    Validation(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn remote(action: RemoteAction, detail: impl Into<String>) -> Self {
        Self::Remote {
            action,
            detail: detail.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the caller must send the user back to authentication.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::SessionExpired)
    }
}
