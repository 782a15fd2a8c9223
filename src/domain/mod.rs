pub mod note;
pub mod user;

// Re-export commonly used types
pub use note::{
    NewNote, Note, NoteChanges, NoteQuery, NoteRepositoryInterface, NoteSortField, NoteSummary,
    SortOrder, DEFAULT_CATEGORY,
};
pub use user::{NewUser, PasswordChange, User, UserChanges, UserRepositoryInterface};

// Re-export errors from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult, DuplicateField};
