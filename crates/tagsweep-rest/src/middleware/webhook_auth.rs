//! Shared-secret authentication for webhook and ingress routes.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tagsweep_core::{TagsweepError, TagsweepResult};
use tracing::debug;

/// Secret and header name checked by [`webhook_auth`].
#[derive(Clone)]
pub struct WebhookAuthState {
    secret: Arc<str>,
    header: HeaderName,
}

impl WebhookAuthState {
    /// Create the state; fails when `header` is not a valid header name.
    pub fn new(secret: impl Into<String>, header: &str) -> TagsweepResult<Self> {
        let header = crate::state::header_name(header)?;
        Ok(Self {
            secret: Arc::from(secret.into()),
            header,
        })
    }

    /// Name of the header carrying the secret.
    #[must_use]
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Whether `presented` matches the configured secret.
    ///
    /// An empty configured secret matches nothing.
    #[must_use]
    pub fn accepts(&self, presented: &[u8]) -> bool {
        !self.secret.is_empty() && bool::from(self.secret.as_bytes().ct_eq(presented))
    }
}

/// Rejects requests without the shared secret before any handler runs.
pub async fn webhook_auth(
    State(auth): State<WebhookAuthState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(&auth.header)
        .map(|value| value.as_bytes());

    match presented {
        Some(value) if auth.accepts(value) => Ok(next.run(request).await),
        Some(_) => {
            debug!(path = %request.uri().path(), "Rejected request with wrong secret");
            Err(TagsweepError::unauthorized("Invalid webhook secret").into())
        }
        None => {
            debug!(path = %request.uri().path(), header = %auth.header, "Rejected request without secret");
            Err(TagsweepError::unauthorized("Missing webhook secret").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_secret_only() {
        let auth = WebhookAuthState::new("s3cret", "x-tagsweep-secret").unwrap();
        assert!(auth.accepts(b"s3cret"));
        assert!(!auth.accepts(b"s3cre"));
        assert!(!auth.accepts(b"s3cret!"));
        assert!(!auth.accepts(b""));
    }

    #[test]
    fn test_empty_secret_rejects_everything() {
        let auth = WebhookAuthState::new("", "x-tagsweep-secret").unwrap();
        assert!(!auth.accepts(b""));
        assert!(!auth.accepts(b"anything"));
    }

    #[test]
    fn test_invalid_header_name_is_config_error() {
        let err = WebhookAuthState::new("s3cret", "bad header").err().unwrap();
        assert!(matches!(err, TagsweepError::Configuration(_)));
    }
}
