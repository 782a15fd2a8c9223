use thiserror::Error;

/// Which unique identity field a registration or update collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Username,
}

impl DuplicateField {
    pub fn message(&self) -> &'static str {
        match self {
            DuplicateField::Email => "Email already in use",
            DuplicateField::Username => "Username already taken",
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", .0.message())]
    Duplicate(DuplicateField),

    /// Unknown email and wrong password are deliberately the same error.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Infra(InfraError::Database(e))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Token error: {0}")]
    Token(String),
}

/// Reasons a request is refused by the authorization layer.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header must be provided as Bearer token")]
    MissingAuth,

    #[error("No token provided, authorization denied")]
    EmptyToken,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Malformed,

    #[error("User not found")]
    UserNotFound,

    /// The token was fine but the user lookup itself failed.
    #[error("User lookup failed: {0}")]
    Lookup(DomainError),
}

pub type DomainResult<T> = Result<T, DomainError>;
