//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;

pub use crypto::{JwtConfig, PasswordHasher, TokenService};
pub use database::{init_database, DatabaseConfig, NoteRepository, UserRepository};
