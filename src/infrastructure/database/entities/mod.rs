//! Database entities module

pub mod note;
pub mod user;

pub use note::Entity as Note;
pub use user::Entity as User;
