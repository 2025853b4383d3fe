use thiserror::Error;

/// Failure reported by a [`Publisher`](crate::services::publisher::Publisher).
///
/// Only observed by the dispatch task; it never reaches the HTTP caller.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to encode audit event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sink rejected audit event with status {0}")]
    Rejected(u16),
    #[error("publisher unavailable: {0}")]
    Unavailable(String),
}

/// Why no profile id could be read from the request's session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session on request")]
    Missing,
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("session subject is not a profile id: {0}")]
    InvalidSubject(String),
}
