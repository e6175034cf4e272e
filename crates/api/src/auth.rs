//! Bearer-token authentication.
//!
//! Provides the [`CurrentUser`] extractor for route handlers and the
//! [`IdentityProvider`] seam it resolves tokens through. The default
//! provider is a fixed token table from configuration; an OAuth or session
//! backed provider slots in behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use secrecy::ExposeSecret;

use inkleaf_core::UserId;

use crate::config::ApiKey;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves bearer tokens to users.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a token to a user id, or `None` for unknown tokens.
    async fn authenticate(&self, token: &str) -> Option<UserId>;
}

/// Identity provider over the fixed token set from configuration.
#[derive(Debug, Default)]
pub struct StaticTokens {
    tokens: HashMap<String, UserId>,
}

impl StaticTokens {
    /// Build the token table from configured API keys.
    ///
    /// Secrets are exposed once here; lookups afterwards are plain map hits.
    #[must_use]
    pub fn from_keys(keys: &[ApiKey]) -> Self {
        let tokens = keys
            .iter()
            .map(|key| (key.token.expose_secret().to_owned(), key.user_id))
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokens {
    async fn authenticate(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).copied()
    }
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user_id): CurrentUser) -> impl IntoResponse {
///     format!("hello, user {user_id}")
/// }
/// ```
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(strip_bearer)
            .ok_or(ApiError::Unauthorized)?;

        let user_id = state
            .identity()
            .authenticate(token)
            .await
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self(user_id))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
fn strip_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
