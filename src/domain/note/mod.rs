//! Note aggregate

pub mod model;
pub mod repository;

mod dto;

pub use dto::{NewNote, NoteChanges, NoteQuery, NoteSortField, SortOrder};
pub use model::{Note, NoteSummary, DEFAULT_CATEGORY};
pub use repository::NoteRepositoryInterface;
