use std::sync::Arc;

use tracing::info;

use crate::domain::{
    DomainError, DomainResult, NewNote, Note, NoteChanges, NoteQuery, NoteRepositoryInterface,
    NoteSortField, SortOrder, DEFAULT_CATEGORY,
};

/// Blank strings are treated as if the field was not sent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn note_not_found(id: i32) -> DomainError {
    DomainError::NotFound {
        entity: "Note",
        field: "id",
        value: id.to_string(),
    }
}

pub struct NoteService {
    notes: Arc<dyn NoteRepositoryInterface>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepositoryInterface>) -> Self {
        Self { notes }
    }

    pub async fn list(&self, owner: i32, query: NoteQuery) -> DomainResult<Vec<Note>> {
        self.notes.list_notes(owner, query).await
    }

    pub async fn get(&self, owner: i32, id: i32) -> DomainResult<Note> {
        self.notes
            .find_note(owner, id)
            .await?
            .ok_or_else(|| note_not_found(id))
    }

    pub async fn create(
        &self,
        owner: i32,
        title: Option<String>,
        content: Option<String>,
        category: Option<String>,
    ) -> DomainResult<Note> {
        let (Some(title), Some(content)) = (non_empty(title), non_empty(content)) else {
            return Err(DomainError::validation("Title and content are required"));
        };

        let note = self
            .notes
            .create_note(NewNote {
                user_id: owner,
                title,
                content,
                category: non_empty(category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            })
            .await?;

        info!(user_id = owner, note_id = note.id, "Note created");
        Ok(note)
    }

    /// Existence is checked before the payload, so a missing note is a 404
    /// even when the body is empty.
    pub async fn update(&self, owner: i32, id: i32, changes: NoteChanges) -> DomainResult<Note> {
        if self.notes.find_note(owner, id).await?.is_none() {
            return Err(note_not_found(id));
        }

        let changes = NoteChanges {
            title: non_empty(changes.title),
            content: non_empty(changes.content),
            category: non_empty(changes.category),
        };
        if changes.is_empty() {
            return Err(DomainError::validation(
                "Please provide at least one field to update",
            ));
        }

        self.notes
            .update_note(owner, id, changes)
            .await?
            .ok_or_else(|| note_not_found(id))
    }

    /// Returns the id of the deleted note.
    pub async fn delete(&self, owner: i32, id: i32) -> DomainResult<i32> {
        if !self.notes.delete_note(owner, id).await? {
            return Err(note_not_found(id));
        }
        info!(user_id = owner, note_id = id, "Note deleted");
        Ok(id)
    }

    pub async fn by_category(&self, owner: i32, category: &str) -> DomainResult<Vec<Note>> {
        self.notes
            .list_notes(
                owner,
                NoteQuery {
                    category: Some(category.to_string()),
                    search: None,
                    sort: NoteSortField::UpdatedAt,
                    order: SortOrder::Desc,
                },
            )
            .await
    }
}
