//! Password hashing utilities

use bcrypt::{hash, verify};
use tracing::debug;

use crate::shared::errors::InfraError;

/// Work factor used for stored digests.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// bcrypt hasher. Both operations run on the blocking pool so async request
/// tasks only suspend while the digest is computed.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower costs are only meant for tests; bcrypt rejects anything below 4.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh random salt. The digest embeds salt and
    /// cost, so [`verify`](Self::verify) needs nothing else.
    pub async fn hash(&self, password: &str) -> Result<String, InfraError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| InfraError::Crypto(format!("hashing task failed: {}", e)))?
            .map_err(|e| InfraError::Crypto(e.to_string()))
    }

    /// Verify a password against a stored digest.
    ///
    /// Never errors: empty input, a malformed digest or a mismatch all yield
    /// `false`.
    pub async fn verify(&self, password: &str, digest: &str) -> bool {
        if password.is_empty() || digest.is_empty() {
            return false;
        }

        let password = password.to_owned();
        let digest = digest.to_owned();

        match tokio::task::spawn_blocking(move || verify(password, &digest)).await {
            Ok(Ok(valid)) => valid,
            Ok(Err(e)) => {
                debug!("Stored digest could not be parsed: {}", e);
                false
            }
            Err(e) => {
                debug!("Verification task failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4)
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hashed = hasher().hash(password).await.unwrap();

        assert_ne!(hashed, password);
        assert!(hasher().verify(password, &hashed).await);
        assert!(!hasher().verify("wrong_password", &hashed).await);
    }

    #[tokio::test]
    async fn salts_differ_between_calls() {
        let a = hasher().hash("password1").await.unwrap();
        let b = hasher().hash("password1").await.unwrap();
        assert_ne!(a, b);
        assert!(hasher().verify("password1", &a).await);
        assert!(hasher().verify("password1", &b).await);
    }

    #[tokio::test]
    async fn digest_embeds_cost() {
        let hashed = PasswordHasher::default().hash("password1").await.unwrap();
        assert!(hashed.starts_with("$2b$10$"));
    }

    #[tokio::test]
    async fn empty_or_garbage_inputs_never_verify() {
        let hashed = hasher().hash("password1").await.unwrap();
        assert!(!hasher().verify("", &hashed).await);
        assert!(!hasher().verify("password1", "").await);
        assert!(!hasher().verify("password1", "not-a-bcrypt-digest").await);
    }
}
