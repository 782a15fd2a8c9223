//! Bearer-token authorization, independent of any HTTP framework.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{User, UserRepositoryInterface};
use crate::infrastructure::crypto::{TokenError, TokenService};
use crate::shared::errors::AuthError;

/// Literal scheme prefix required on the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Identity attached to an authorized request. Carries no secret material.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Pull the token out of a raw `Authorization` header value.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let rest = header
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingAuth)?;

    match rest.split(' ').next() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::EmptyToken),
    }
}

/// Resolve an `Authorization` header to a live user.
///
/// Order matters: header shape, then signature and expiry at `now`, then
/// the user lookup, so a token for a deleted account is refused even while
/// still within its lifetime.
pub async fn authorize(
    header: Option<&str>,
    now: DateTime<Utc>,
    tokens: &TokenService,
    users: &dyn UserRepositoryInterface,
) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_bearer(header)?;

    let claims = tokens.verify_at(token, now).map_err(|e| match e {
        TokenError::Expired => AuthError::Expired,
        other => {
            debug!("Token rejected: {}", other);
            AuthError::Malformed
        }
    })?;

    let user = users
        .find_by_id(claims.id)
        .await
        .map_err(AuthError::Lookup)?
        .ok_or(AuthError::UserNotFound)?;

    Ok(AuthenticatedUser::from(user))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::domain::NewUser;
    use crate::infrastructure::crypto::{JwtConfig, PasswordHasher};
    use crate::infrastructure::database::{test_database, UserRepository};
    use crate::shared::clock::FixedClock;

    fn tokens() -> TokenService {
        TokenService::new(JwtConfig::new("authorization-test-secret").unwrap())
    }

    async fn users_with_alice() -> (UserRepository, User) {
        let repo = UserRepository::new(test_database().await, PasswordHasher::with_cost(4));
        let alice = repo
            .create_user(NewUser {
                username: "alice".into(),
                email: "alice@x.com".into(),
                password: "password1".into(),
            })
            .await
            .unwrap();
        (repo, alice)
    }

    #[test]
    fn header_shape_is_checked_before_anything_else() {
        assert!(matches!(extract_bearer(None), Err(AuthError::MissingAuth)));
        assert!(matches!(
            extract_bearer(Some("abc.def.ghi")),
            Err(AuthError::MissingAuth)
        ));
        assert!(matches!(
            extract_bearer(Some("bearer abc")),
            Err(AuthError::MissingAuth)
        ));
        assert!(matches!(
            extract_bearer(Some("Bearer ")),
            Err(AuthError::EmptyToken)
        ));
        assert_eq!(extract_bearer(Some("Bearer abc")).unwrap(), "abc");
    }

    #[tokio::test]
    async fn valid_token_resolves_user_without_secret() {
        let (repo, alice) = users_with_alice().await;
        let tokens = tokens();
        let header = format!("Bearer {}", tokens.issue(alice.id).unwrap());

        let user = authorize(Some(&header), Utc::now(), &tokens, &repo)
            .await
            .unwrap();
        assert_eq!(user.id, alice.id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@x.com");
    }

    #[tokio::test]
    async fn expired_and_malformed_tokens_are_distinguished() {
        let (repo, alice) = users_with_alice().await;
        let issued = Utc::now() - Duration::hours(3);
        let old_tokens = TokenService::with_clock(
            JwtConfig::new("authorization-test-secret").unwrap(),
            Arc::new(FixedClock(issued)),
        );
        let expired = format!("Bearer {}", old_tokens.issue(alice.id).unwrap());

        let tokens = tokens();
        assert!(matches!(
            authorize(Some(&expired), Utc::now(), &tokens, &repo).await,
            Err(AuthError::Expired)
        ));
        assert!(matches!(
            authorize(Some("Bearer not-a-jwt"), Utc::now(), &tokens, &repo).await,
            Err(AuthError::Malformed)
        ));
    }

    #[tokio::test]
    async fn deleted_user_is_refused() {
        let (repo, alice) = users_with_alice().await;
        let tokens = tokens();
        let header = format!("Bearer {}", tokens.issue(alice.id).unwrap());

        repo.delete_user(alice.id).await.unwrap();

        assert!(matches!(
            authorize(Some(&header), Utc::now(), &tokens, &repo).await,
            Err(AuthError::UserNotFound)
        ));
    }
}
