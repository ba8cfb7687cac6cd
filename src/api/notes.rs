// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{optional_json_body, ApiJson};
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        AddNoteRequest, EditNoteRequest, MessageResponse, NoteResponse, NotesResponse,
        UpdatePinnedRequest,
    },
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Text to look for in note titles and contents.
    pub query: Option<String>,
}

#[utoipa::path(
    post,
    path = "/add-note",
    request_body = AddNoteRequest,
    tag = "Notes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = NoteResponse),
        (status = 400, description = "Missing title or content"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn add_note(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<AddNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state
        .notes()
        .add(user.user_id, request.title, request.content, request.tags)?;

    Ok(Json(NoteResponse {
        error: false,
        message: "Note added successfully".to_string(),
        note,
    }))
}

#[utoipa::path(
    put,
    path = "/edit-note/{note_id}",
    params(("note_id" = String, Path, description = "Identifier of the note to edit")),
    request_body = EditNoteRequest,
    tag = "Notes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = NoteResponse),
        (status = 400, description = "No changes provided"),
        (status = 404, description = "Note not found")
    )
)]
pub async fn edit_note(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<String>,
    ApiJson(request): ApiJson<EditNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.notes().edit(user.user_id, &note_id, request)?;

    Ok(Json(NoteResponse {
        error: false,
        message: "Note updated successfully".to_string(),
        note,
    }))
}

#[utoipa::path(
    put,
    path = "/update-note-pinned/{note_id}",
    params(("note_id" = String, Path, description = "Identifier of the note to pin or unpin")),
    request_body = UpdatePinnedRequest,
    tag = "Notes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "A missing body or flag unpins", body = NoteResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 404, description = "Note not found")
    )
)]
pub async fn update_note_pinned(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<NoteResponse>, ApiError> {
    let request: UpdatePinnedRequest = optional_json_body(&headers, &body)?;
    let note = state
        .notes()
        .set_pinned(user.user_id, &note_id, request.is_pinned)?;

    Ok(Json(NoteResponse {
        error: false,
        message: "Note updated successfully".to_string(),
        note,
    }))
}

#[utoipa::path(
    delete,
    path = "/delete-note/{note_id}",
    params(("note_id" = String, Path, description = "Identifier of the note to delete")),
    tag = "Notes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Note not found")
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(note_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.notes().delete(user.user_id, &note_id)?;
    Ok(Json(MessageResponse::ok("Note deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/get-all-notes",
    tag = "Notes",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Pinned notes first", body = NotesResponse))
)]
pub async fn get_all_notes(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<NotesResponse>, ApiError> {
    let notes = state.notes().list(user.user_id)?;

    Ok(Json(NotesResponse {
        error: false,
        message: "All notes retrieved successfully".to_string(),
        notes,
    }))
}

#[utoipa::path(
    get,
    path = "/search-notes",
    params(SearchQuery),
    tag = "Notes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = NotesResponse),
        (status = 400, description = "Search query is required")
    )
)]
pub async fn search_notes(
    State(state): State<AppState>,
    Auth(user): Auth,
    Query(params): Query<SearchQuery>,
) -> Result<Json<NotesResponse>, ApiError> {
    let query = params.query.unwrap_or_default();
    let notes = state.search().search(user.user_id, &query)?;

    Ok(Json(NotesResponse {
        error: false,
        message: "Notes matching the search query retrieved successfully".to_string(),
        notes,
    }))
}
