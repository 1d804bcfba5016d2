/**
 * Authentication Middleware
 *
 * This module protects the `/api` routes. It extracts the bearer token,
 * verifies it, loads the caller's `Identity` and attaches it to the request
 * extensions, where the `AuthUser` extractor picks it up.
 *
 * The websocket route does not use the middleware: an anonymous connection
 * must reach the session so it can be closed there. It calls
 * `resolve_identity` directly instead.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

use crate::backend::auth::sessions::get_user_id_from_token;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::chat::Identity;

/// Token from an `Authorization: Bearer <token>` header, if present
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify `token` and load the identity it names
///
/// Fails with `Unauthorized` for a bad token or a user the store does not
/// know about.
pub async fn resolve_identity(
    pool: &SqlitePool,
    secret: &str,
    token: &str,
) -> BackendResult<Identity> {
    let user_id = get_user_id_from_token(token, secret).map_err(|e| {
        tracing::warn!("[Auth] {}", e);
        BackendError::unauthorized("Invalid token")
    })?;

    get_user_by_id(pool, user_id).await?.ok_or_else(|| {
        tracing::warn!("[Auth] Token names unknown user {}", user_id);
        BackendError::unauthorized("Unknown user")
    })
}

/// Authentication middleware
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::warn!("[Auth] Missing or malformed Authorization header");
        BackendError::unauthorized("Authentication required")
    })?;

    let identity = resolve_identity(&app_state.pool, &app_state.jwt_secret, token).await?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated identity
///
/// Reads the `Identity` that `auth_middleware` stored on the request.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts.extensions.get::<Identity>().cloned().ok_or_else(|| {
            tracing::warn!("[Auth] Identity not found in request extensions");
            BackendError::unauthorized("Authentication required")
        })?;

        Ok(AuthUser(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_extractor_without_identity() {
        let request = axum::http::Request::builder()
            .uri("http://example.com")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(BackendError::Unauthorized { .. })));
    }
}
