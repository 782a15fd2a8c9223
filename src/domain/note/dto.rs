#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
}

/// Partial note update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteSortField {
    CreatedAt,
    #[default]
    UpdatedAt,
    Title,
    Category,
}

impl NoteSortField {
    /// Parses the client-facing field name; unknown names fall back to the default.
    pub fn parse(s: &str) -> Self {
        match s {
            "createdAt" | "created_at" => Self::CreatedAt,
            "updatedAt" | "updated_at" => Self::UpdatedAt,
            "title" => Self::Title,
            "category" => Self::Category,
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Filters for listing one owner's notes.
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    pub category: Option<String>,
    /// Substring matched against title or content.
    pub search: Option<String>,
    pub sort: NoteSortField,
    pub order: SortOrder,
}
