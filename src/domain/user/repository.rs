use async_trait::async_trait;

use super::{NewUser, User, UserChanges};
use crate::domain::DomainResult;

/// Credential store.
///
/// `create` and `update` take plaintext passwords and are responsible for
/// hashing them; callers never see or pass digests in.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Fails with `DomainError::Duplicate` when the username or email is
    /// taken, whether caught by the pre-check or by the unique constraint.
    async fn create_user(&self, new_user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Single query matching either identity field.
    async fn find_conflict(&self, username: &str, email: &str) -> DomainResult<Option<User>>;

    async fn update_user(&self, id: i32, changes: UserChanges) -> DomainResult<Option<User>>;
    async fn delete_user(&self, id: i32) -> DomainResult<()>;
}
