//! User aggregate
//!
//! Contains the User entity, its write DTOs, and the credential store
//! interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_update;

pub use model::User;

pub use dto_create::NewUser;
pub use dto_update::{PasswordChange, UserChanges};

pub use repository::UserRepositoryInterface;
