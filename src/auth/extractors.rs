use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use super::{
    dto::{JwtKeys, TokenKind},
    repo::UserDirectory,
};
use crate::error::AppError;

/// Id of the caller, taken from a valid `Bearer` access token whose
/// subject is still a stored user.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    Arc<dyn UserDirectory>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::NotAuthenticated("missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::NotAuthenticated("invalid auth scheme".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::NotAuthenticated("invalid or expired token".into())
        })?;

        if claims.kind != TokenKind::Access {
            return Err(AppError::NotAuthenticated("access token required".into()));
        }

        let users = <Arc<dyn UserDirectory>>::from_ref(state);
        if !users.exists(claims.sub).await? {
            warn!(user_id = %claims.sub, "token subject no longer exists");
            return Err(AppError::NotAuthenticated("user not found".into()));
        }

        Ok(AuthUser(claims.sub))
    }
}
