//! Error Types
//!
//! Two layers: `ApiError` for failures talking to the remote store,
//! `StudioError` for everything surfaced to the user.

use thiserror::Error;

/// Failures from the remote store collaborators
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure (DNS, refused, timeout)
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Session expired; the caller redirects to login
    #[error("session expired, sign in again")]
    Unauthorized,

    /// Response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Only session expiry is fatal; everything else is retryable
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// User-visible failures
#[derive(Debug, Error)]
pub enum StudioError {
    /// A required field was empty before submit; never reaches the network
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// Child creation under a parent the store has not confirmed yet;
    /// blocked client-side instead of failing server-side
    #[error("save the {parent} before adding a {child}")]
    ParentNotSaved {
        parent: &'static str,
        child: &'static str,
    },

    /// A create/update/delete against the store failed
    #[error("sync failed: {0}")]
    Network(#[source] ApiError),

    /// Quiz submission failed before grading; safe to retry
    #[error("could not submit answers: {0}")]
    Grading(#[source] ApiError),

    /// The entity vanished from the local tree before the edit landed
    #[error("{kind} no longer exists")]
    Missing { kind: &'static str },
}

impl StudioError {
    pub fn is_fatal(&self) -> bool {
        match self {
            StudioError::Network(err) | StudioError::Grading(err) => err.is_fatal(),
            _ => false,
        }
    }
}

pub type StudioResult<T> = Result<T, StudioError>;
