use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::domain::{
    DomainError, DomainResult, DuplicateField, NewUser, PasswordChange, User, UserChanges,
    UserRepositoryInterface,
};
use crate::infrastructure::crypto::PasswordHasher;
use crate::infrastructure::database::entities::user;

/// SeaORM-backed credential store. Owns the hasher so plaintext never
/// reaches the database.
pub struct UserRepository {
    db: DatabaseConnection,
    hasher: PasswordHasher,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    /// Insert without the existence pre-check. The unique constraints still
    /// apply and are mapped to `Duplicate`.
    async fn insert_hashed(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> DomainResult<User> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: NotSet,
            username: Set(username.clone()),
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match new_user.insert(&self.db).await {
            Ok(model) => Ok(user_model_to_domain(model)),
            Err(e) => Err(self.map_write_error(e, &username, &email).await),
        }
    }

    /// Turn a unique-constraint violation into `Duplicate`, naming the
    /// colliding field. Anything else stays a database error.
    async fn map_write_error(&self, e: DbErr, username: &str, email: &str) -> DomainError {
        let Some(SqlErr::UniqueConstraintViolation(message)) = e.sql_err() else {
            return e.into();
        };

        if let Some(field) = duplicate_field_from_message(&message) {
            return DomainError::Duplicate(field);
        }

        // Constraint name did not say which column; ask the table.
        match self.find_conflict(username, email).await {
            Ok(Some(existing)) => DomainError::Duplicate(conflict_field(&existing, email)),
            _ => DomainError::Duplicate(DuplicateField::Email),
        }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Email wins when both fields collide.
fn conflict_field(existing: &User, email: &str) -> DuplicateField {
    if existing.email == email {
        DuplicateField::Email
    } else {
        DuplicateField::Username
    }
}

/// SQLite reports `UNIQUE constraint failed: users.email`, Postgres names
/// the constraint (`users_email_key`). Both mention the column.
fn duplicate_field_from_message(message: &str) -> Option<DuplicateField> {
    let message = message.to_lowercase();
    if message.contains("email") {
        Some(DuplicateField::Email)
    } else if message.contains("username") {
        Some(DuplicateField::Username)
    } else {
        None
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, new_user: NewUser) -> DomainResult<User> {
        // Best-effort pre-check so the common case reports a precise reason
        // without relying on driver error text.
        if let Some(existing) = self
            .find_conflict(&new_user.username, &new_user.email)
            .await?
        {
            return Err(DomainError::Duplicate(conflict_field(
                &existing,
                &new_user.email,
            )));
        }

        let password_hash = self.hasher.hash(&new_user.password).await?;

        self.insert_hashed(new_user.username, new_user.email, password_hash)
            .await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_conflict(&self, username: &str, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .one(&self.db)
            .await?;

        Ok(model.map(user_model_to_domain))
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let username = changes
            .username
            .clone()
            .unwrap_or_else(|| existing.username.clone());
        let email = changes
            .email
            .clone()
            .unwrap_or_else(|| existing.email.clone());

        let mut active: user::ActiveModel = existing.into();

        if let Some(new_username) = changes.username {
            active.username = Set(new_username);
        }
        if let Some(new_email) = changes.email {
            active.email = Set(new_email);
        }
        if let PasswordChange::Replace(plaintext) = changes.password {
            active.password_hash = Set(self.hasher.hash(&plaintext).await?);
        }

        active.updated_at = Set(Utc::now());

        match active.update(&self.db).await {
            Ok(updated) => Ok(Some(user_model_to_domain(updated))),
            Err(e) => Err(self.map_write_error(e, &username, &email).await),
        }
    }

    async fn delete_user(&self, id: i32) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::database::test_database;

    async fn repo() -> UserRepository {
        UserRepository::new(test_database().await, PasswordHasher::with_cost(4))
    }

    fn alice() -> NewUser {
        NewUser {
            username: "alice".into(),
            email: "alice@x.com".into(),
            password: "password1".into(),
        }
    }

    #[tokio::test]
    async fn create_stores_digest_not_plaintext() {
        let repo = repo().await;
        let user = repo.create_user(alice()).await.unwrap();

        assert!(user.id > 0);
        assert_ne!(user.password_hash, "password1");
        assert!(
            PasswordHasher::with_cost(4)
                .verify("password1", &user.password_hash)
                .await
        );

        let by_email = repo.find_by_email("alice@x.com").await.unwrap().unwrap();
        let by_name = repo.find_by_username("alice").await.unwrap().unwrap();
        let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_id.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn duplicate_email_and_username_are_reported_separately() {
        let repo = repo().await;
        repo.create_user(alice()).await.unwrap();

        let same_email = NewUser {
            username: "alice2".into(),
            ..alice()
        };
        assert!(matches!(
            repo.create_user(same_email).await,
            Err(DomainError::Duplicate(DuplicateField::Email))
        ));

        let same_name = NewUser {
            email: "other@x.com".into(),
            ..alice()
        };
        assert!(matches!(
            repo.create_user(same_name).await,
            Err(DomainError::Duplicate(DuplicateField::Username))
        ));
    }

    #[tokio::test]
    async fn unique_constraint_is_mapped_when_precheck_is_bypassed() {
        let repo = repo().await;
        repo.create_user(alice()).await.unwrap();

        let err = repo
            .insert_hashed("bob".into(), "alice@x.com".into(), "digest".into())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(DuplicateField::Email)));

        let err = repo
            .insert_hashed("alice".into(), "bob@x.com".into(), "digest".into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Duplicate(DuplicateField::Username)
        ));
    }

    #[tokio::test]
    async fn concurrent_registrations_have_one_winner() {
        let repo = Arc::new(repo().await);

        let first = {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create_user(alice()).await })
        };
        let second = {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create_user(NewUser {
                    username: "alice-again".into(),
                    ..alice()
                })
                .await
            })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let dup = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::Duplicate(DuplicateField::Email))))
            .count();
        assert_eq!((ok, dup), (1, 1));
    }

    #[tokio::test]
    async fn updating_profile_fields_keeps_digest() {
        let repo = repo().await;
        let user = repo.create_user(alice()).await.unwrap();

        let updated = repo
            .update_user(
                user.id,
                UserChanges {
                    username: Some("alice_renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.username, "alice_renamed");
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn replacing_password_recomputes_digest() {
        let repo = repo().await;
        let user = repo.create_user(alice()).await.unwrap();

        let updated = repo
            .update_user(user.id, UserChanges::password("new-password"))
            .await
            .unwrap()
            .unwrap();

        let hasher = PasswordHasher::with_cost(4);
        assert_ne!(updated.password_hash, user.password_hash);
        assert!(hasher.verify("new-password", &updated.password_hash).await);
        assert!(!hasher.verify("password1", &updated.password_hash).await);
    }

    #[tokio::test]
    async fn update_into_taken_email_is_duplicate() {
        let repo = repo().await;
        repo.create_user(alice()).await.unwrap();
        let bob = repo
            .create_user(NewUser {
                username: "bob".into(),
                email: "bob@x.com".into(),
                password: "password2".into(),
            })
            .await
            .unwrap();

        let result = repo
            .update_user(
                bob.id,
                UserChanges {
                    email: Some("alice@x.com".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Duplicate(DuplicateField::Email))
        ));
    }

    #[tokio::test]
    async fn update_and_delete_missing_user() {
        let repo = repo().await;
        assert!(repo
            .update_user(99, UserChanges::default())
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            repo.delete_user(99).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn constraint_messages_name_the_field() {
        assert_eq!(
            duplicate_field_from_message("UNIQUE constraint failed: users.email"),
            Some(DuplicateField::Email)
        );
        assert_eq!(
            duplicate_field_from_message(
                "duplicate key value violates unique constraint \"users_username_key\""
            ),
            Some(DuplicateField::Username)
        );
        assert_eq!(duplicate_field_from_message("something else"), None);
    }
}
