use chrono::{DateTime, Utc};

/// Category assigned when a note is created without one.
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short form listed on the owner's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteSummary {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteSummary {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            category: note.category,
            created_at: note.created_at,
        }
    }
}
