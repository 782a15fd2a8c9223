//! Note API handlers
//!
//! Every handler runs behind the auth middleware and only sees the caller's
//! own notes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CategoryNotesResponse, CreateNoteRequest, DeleteNoteResponse, NoteDto, NoteListParams,
    NoteListResponse, NoteMessageResponse, UpdateNoteRequest,
};
use crate::application::{AuthenticatedUser, NoteService};
use crate::interfaces::http::common::{
    ApiError, ApiResult, MessageResponse, QueryParams, ValidatedJson,
};

#[derive(Clone)]
pub struct NotesHandlerState {
    pub service: Arc<NoteService>,
}

/// Ids that are not numbers cannot name a note.
fn parse_note_id(raw: &str) -> ApiResult<i32> {
    raw.parse()
        .map_err(|_| ApiError::not_found("Note not found"))
}

#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(NoteListParams),
    responses(
        (status = 200, description = "Caller's notes", body = NoteListResponse),
        (status = 400, description = "Malformed query string", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    )
)]
pub async fn list_notes(
    State(state): State<NotesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    QueryParams(params): QueryParams<NoteListParams>,
) -> ApiResult<Json<NoteListResponse>> {
    let notes = state.service.list(user.id, params.into()).await?;

    Ok(Json(NoteListResponse {
        count: notes.len(),
        notes: NoteDto::list(notes, &user.username),
    }))
}

#[utoipa::path(
    get,
    path = "/api/notes/category/{category}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("category" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Notes in category, newest change first", body = CategoryNotesResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    )
)]
pub async fn list_notes_by_category(
    State(state): State<NotesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(category): Path<String>,
) -> ApiResult<Json<CategoryNotesResponse>> {
    let notes = state.service.by_category(user.id, &category).await?;

    Ok(Json(CategoryNotesResponse {
        category,
        count: notes.len(),
        notes: NoteDto::list(notes, &user.username),
    }))
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note", body = NoteDto),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    )
)]
pub async fn get_note(
    State(state): State<NotesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<NoteDto>> {
    let id = parse_note_id(&id)?;
    let note = state.service.get(user.id, id).await?;
    Ok(Json(NoteDto::new(note, &user.username)))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    security(("bearer_auth" = [])),
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = NoteMessageResponse),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse)
    )
)]
pub async fn create_note(
    State(state): State<NotesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<NoteMessageResponse>)> {
    let note = state
        .service
        .create(user.id, request.title, request.content, request.category)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NoteMessageResponse {
            message: "Note created successfully".to_string(),
            note: NoteDto::new(note, &user.username),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Note id")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteMessageResponse),
        (status = 400, description = "Nothing to update", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    )
)]
pub async fn update_note(
    State(state): State<NotesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateNoteRequest>,
) -> ApiResult<Json<NoteMessageResponse>> {
    let id = parse_note_id(&id)?;
    let note = state.service.update(user.id, id, request.into()).await?;

    Ok(Json(NoteMessageResponse {
        message: "Note updated successfully".to_string(),
        note: NoteDto::new(note, &user.username),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note deleted", body = DeleteNoteResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse)
    )
)]
pub async fn delete_note(
    State(state): State<NotesHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteNoteResponse>> {
    let id = parse_note_id(&id)?;
    let id = state.service.delete(user.id, id).await?;

    Ok(Json(DeleteNoteResponse {
        message: "Note deleted successfully".to_string(),
        id,
    }))
}
