//! Note DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Note, NoteChanges, NoteQuery, NoteSortField, SortOrder};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateNoteRequest {
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(length(max = 50, message = "category must be at most 50 characters"))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateNoteRequest {
    #[validate(length(max = 255, message = "title must be at most 255 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(length(max = 50, message = "category must be at most 50 characters"))]
    pub category: Option<String>,
}

impl From<UpdateNoteRequest> for NoteChanges {
    fn from(req: UpdateNoteRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category: req.category,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoteListParams {
    /// Exact category match
    pub category: Option<String>,
    /// Substring of title or content
    pub search: Option<String>,
    /// createdAt | updatedAt | title | category (default updatedAt)
    pub sort: Option<String>,
    /// ASC | DESC (default DESC)
    pub order: Option<String>,
}

impl From<NoteListParams> for NoteQuery {
    fn from(params: NoteListParams) -> Self {
        Self {
            category: params.category.filter(|c| !c.is_empty()),
            search: params.search.filter(|s| !s.is_empty()),
            sort: params
                .sort
                .as_deref()
                .map(NoteSortField::parse)
                .unwrap_or_default(),
            order: params
                .order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteOwner {
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub category: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: NoteOwner,
}

impl NoteDto {
    pub fn new(note: Note, owner: &str) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            category: note.category,
            user_id: note.user_id,
            created_at: note.created_at,
            updated_at: note.updated_at,
            user: NoteOwner {
                username: owner.to_string(),
            },
        }
    }

    pub fn list(notes: Vec<Note>, owner: &str) -> Vec<Self> {
        notes.into_iter().map(|n| Self::new(n, owner)).collect()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteListResponse {
    pub count: usize,
    pub notes: Vec<NoteDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryNotesResponse {
    pub category: String,
    pub count: usize,
    pub notes: Vec<NoteDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoteMessageResponse {
    pub message: String,
    pub note: NoteDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteNoteResponse {
    pub message: String,
    pub id: i32,
}
