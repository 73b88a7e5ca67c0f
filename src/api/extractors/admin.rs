use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{warn, Span};

use crate::error::AppError;
use crate::state::AppState;

/// Caller presented the configured admin bearer token.
pub struct AdminUser;

/// Admin if a valid token is present, guest otherwise.
pub struct MaybeAdmin(pub Option<AdminUser>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn token_matches(presented: &str, expected: &str) -> bool {
    // compare digests so the check does not leak the token length or prefix
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_token.as_deref() else {
            warn!("Privileged request rejected: ADMIN_TOKEN is not configured");
            return Err(AppError::Unauthorized);
        };

        let presented = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        if !token_matches(presented, expected) {
            return Err(AppError::Unauthorized);
        }

        Span::current().record("admin", true);
        Ok(AdminUser)
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        // an invalid token is treated as a guest
        Ok(MaybeAdmin(AdminUser::from_request_parts(parts, state).await.ok()))
    }
}
