//! Authentication API handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};

use super::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, ProfileResponse, RegisterRequest,
    TokenResponse, UserView,
};
use crate::application::{AuthService, AuthenticatedUser};
use crate::interfaces::http::common::{ApiResult, JsonBody, MessageResponse};

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub service: Arc<AuthService>,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate user", body = MessageResponse)
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let session = state
        .service
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: UserView::with_created_at(&session.user),
            token: session.token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = AuthResponse),
        (status = 400, description = "Empty body or missing field", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    body: Bytes,
) -> ApiResult<Json<AuthResponse>> {
    let request = LoginRequest::from_bytes(&body)?;

    let session = state
        .service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserView::from(&session.user),
        token: session.token,
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user with note summaries", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.service.profile(user.id).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh-token",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New token issued", body = TokenResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.service.refresh(user.id)?;

    Ok(Json(TokenResponse {
        message: "Token refreshed successfully".to_string(),
        token,
    }))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 401, description = "Current password is wrong", body = MessageResponse)
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .service
        .change_password(user.id, &request.current_password, &request.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}
