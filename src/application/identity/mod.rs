//! Identity module: registration, login and request authorization
//!
//! `AuthService` orchestrates the credential store, the password hasher and
//! the token service. `authorize` is the framework-independent core of the
//! HTTP auth middleware.

pub mod authorization;
pub mod service;

pub use authorization::{authorize, extract_bearer, AuthenticatedUser, BEARER_PREFIX};
pub use service::{AuthService, AuthSession, Profile, MIN_PASSWORD_LENGTH};
