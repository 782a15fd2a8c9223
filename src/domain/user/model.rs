use std::fmt;

use chrono::{DateTime, Utc};

/// User record as held by the credential store.
///
/// `password_hash` is always a bcrypt digest. It is redacted from `Debug`
/// output and there is deliberately no `Serialize` impl; HTTP responses go
/// through the public views in the interface layer.
#[derive(Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
