//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::identity::authorize;
use crate::domain::UserRepositoryInterface;
use crate::infrastructure::crypto::TokenService;
use crate::interfaces::http::common::ApiError;

pub use crate::application::identity::AuthenticatedUser;

/// What the middleware needs to resolve a bearer token to a user.
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserRepositoryInterface>,
}

/// Bearer-token middleware for protected routes.
///
/// On success the `AuthenticatedUser` is inserted into request extensions.
/// On failure the handler is never reached.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let result = authorize(
        auth_header,
        state.tokens.now(),
        &state.tokens,
        state.users.as_ref(),
    )
    .await;

    match result {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
