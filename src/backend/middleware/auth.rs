/**
 * Authentication Middleware
 *
 * Protects the API routes. The service runs a demo scheme: the bearer
 * token itself is the user id, there is no token verification layer.
 * The middleware extracts the token and attaches an [`AuthenticatedUser`]
 * to request extensions; handlers receive it through the [`AuthUser`]
 * extractor.
 */

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::backend::error::ApiError;

/// Identity attached to every authenticated request.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Authentication middleware
///
/// 1. Reads the `Authorization: Bearer <token>` header
/// 2. Treats the token as the user id (demo semantics)
/// 3. Attaches [`AuthenticatedUser`] to request extensions
///
/// Returns the 401 envelope when the header is missing or malformed.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    // Owned before the request is mutated below.
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    let Some(token) = token else {
        tracing::warn!("missing or malformed Authorization header");
        return ApiError::Unauthorized.into_response();
    };

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id: token });
    next.run(request).await
}

/// Axum extractor for the authenticated user.
///
/// Handlers take `AuthUser(user)` as a parameter; the rejection is the
/// same 401 envelope the middleware produces, which only triggers if a
/// route forgot the auth layer.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser missing from request extensions");
                ApiError::Unauthorized
            })
    }
}
