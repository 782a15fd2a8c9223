//! Authentication service: application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use tracing::{debug, info};
use validator::ValidateEmail;

use crate::domain::{
    DomainError, DomainResult, NewUser, NoteRepositoryInterface, NoteSummary, User, UserChanges,
    UserRepositoryInterface,
};
use crate::infrastructure::crypto::{PasswordHasher, TokenService};
use crate::shared::errors::InfraError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub notes: Vec<NoteSummary>,
}

/// Registration, login, token refresh and password changes.
///
/// Holds no state of its own beyond shared handles.
pub struct AuthService {
    users: Arc<dyn UserRepositoryInterface>,
    notes: Arc<dyn NoteRepositoryInterface>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepositoryInterface>,
        notes: Arc<dyn NoteRepositoryInterface>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            notes,
            tokens,
            hasher,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    fn issue_token(&self, user_id: i32) -> DomainResult<String> {
        self.tokens
            .issue(user_id)
            .map_err(|e| InfraError::Token(e.to_string()).into())
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user and sign them in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<AuthSession> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(DomainError::validation("All fields are required"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(
                "Password must be at least 8 characters long",
            ));
        }
        if !email.validate_email() {
            return Err(DomainError::validation("Invalid email address"));
        }

        let user = self
            .users
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let token = self.issue_token(user.id)?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(AuthSession { user, token })
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify email + password and issue a token.
    ///
    /// An unknown email and a wrong password produce the same
    /// `InvalidCredentials` error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthSession> {
        // Registration stores the trimmed address.
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::validation("Email and password are required"));
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            debug!("Login rejected");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await {
            debug!(user_id = user.id, "Login rejected");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.issue_token(user.id)?;

        info!(user_id = user.id, "User logged in");
        Ok(AuthSession { user, token })
    }

    /// New token with a fresh lifetime for an already-authorized user. The
    /// previous token stays valid until it expires on its own.
    pub fn refresh(&self, user_id: i32) -> DomainResult<String> {
        let token = self.issue_token(user_id)?;
        debug!(user_id, "Token refreshed");
        Ok(token)
    }

    // ── Profile ─────────────────────────────────────────────────

    pub async fn profile(&self, user_id: i32) -> DomainResult<Profile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })?;

        let notes = self.notes.list_summaries(user_id).await?;

        Ok(Profile { user, notes })
    }

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(DomainError::validation(
                "Current and new password are required",
            ));
        }
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation(
                "New password must be at least 8 characters long",
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: user_id.to_string(),
            })?;

        if !self.hasher.verify(current_password, &user.password_hash).await {
            return Err(DomainError::InvalidCredentials);
        }

        self.users
            .update_user(user_id, UserChanges::password(new_password))
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }
}
