//! Authentication DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::application::{AuthenticatedUser, Profile};
use crate::domain::{NoteSummary, User};
use crate::interfaces::http::common::ApiError;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Documentation shape only. The handler parses the raw body so it can
/// tell an empty body from a missing field.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Parse a login body. Non-string values are coerced to strings and
    /// missing fields become empty, leaving field checks to the service.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ApiError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::bad_request("Request body is empty"));
        }

        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        let Value::Object(fields) = value else {
            return Err(ApiError::bad_request("Request body must be a JSON object"));
        };
        if fields.is_empty() {
            return Err(ApiError::bad_request("Request body is empty"));
        }

        Ok(Self {
            email: coerce_string(fields.get("email")),
            password: coerce_string(fields.get("password")),
        })
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public view of a user. Never carries the password digest.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserView {
    pub fn with_created_at(user: &User) -> Self {
        Self {
            created_at: Some(user.created_at),
            ..Self::from(user)
        }
    }
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummaryDto {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<NoteSummary> for NoteSummaryDto {
    fn from(s: NoteSummary) -> Self {
        Self {
            id: s.id,
            title: s.title,
            category: s.category,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub notes: Vec<NoteSummaryDto>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let user = AuthenticatedUser::from(profile.user);
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
            notes: profile.notes.into_iter().map(Into::into).collect(),
        }
    }
}
