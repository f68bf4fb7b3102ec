//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use brandhub_common::AppError;

/// Caller identity established by the external session gateway.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Opaque user ID.
    pub user_id: String,
    /// Whether the session carries the admin capability.
    pub is_admin: bool,
}

/// Authenticated user extractor.
///
/// Rejects with `Unauthenticated` before the handler body runs, so no
/// mutation is ever attempted for an anonymous caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get identity from request extensions (set by identity middleware)
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthenticated)
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().cloned()))
    }
}
