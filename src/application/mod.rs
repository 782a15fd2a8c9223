pub mod identity;
pub mod notes;

pub use identity::{AuthService, AuthSession, AuthenticatedUser, Profile};
pub use notes::NoteService;
