/// What to do with the stored password digest on update.
#[derive(Clone, Default)]
pub enum PasswordChange {
    #[default]
    Keep,
    /// New plaintext; the store recomputes the digest.
    Replace(String),
}

/// Partial update of a user record. `None` leaves the field untouched.
#[derive(Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: PasswordChange,
}

impl UserChanges {
    pub fn password(plaintext: impl Into<String>) -> Self {
        Self {
            password: PasswordChange::Replace(plaintext.into()),
            ..Self::default()
        }
    }
}
