use async_trait::async_trait;

use super::{NewNote, Note, NoteChanges, NoteQuery, NoteSummary};
use crate::domain::DomainResult;

/// Note store. Every operation is scoped to an owner id; a note belonging
/// to someone else behaves exactly like a missing one.
#[async_trait]
pub trait NoteRepositoryInterface: Send + Sync {
    async fn create_note(&self, note: NewNote) -> DomainResult<Note>;

    async fn list_notes(&self, user_id: i32, query: NoteQuery) -> DomainResult<Vec<Note>>;
    async fn find_note(&self, user_id: i32, id: i32) -> DomainResult<Option<Note>>;
    async fn list_summaries(&self, user_id: i32) -> DomainResult<Vec<NoteSummary>>;

    async fn update_note(
        &self,
        user_id: i32,
        id: i32,
        changes: NoteChanges,
    ) -> DomainResult<Option<Note>>;

    /// Returns `false` when nothing was deleted.
    async fn delete_note(&self, user_id: i32, id: i32) -> DomainResult<bool>;
}
