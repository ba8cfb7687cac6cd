// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    extract::FromRequest,
    http::{header::CONTENT_TYPE, HeaderMap, Request},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    error::ApiError,
    models::{
        AddNoteRequest, CreateAccountRequest, EditNoteRequest, LoginRequest, LoginResponse,
        MessageResponse, Note, NoteId, NoteResponse, NotesResponse, RegisterResponse,
        UpdatePinnedRequest, UserId, UserResponse, UserView,
    },
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod notes;

/// JSON body extractor whose rejection is rendered as an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Decode a JSON body that the client may leave out.
///
/// A request without a JSON content type, or with a blank body, yields
/// `T::default()`. A JSON body that is present but malformed is still a 400.
pub fn optional_json_body<T>(headers: &HeaderMap, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let axum::Json(value) = axum::Json::<T>::from_bytes(body)?;
    Ok(value)
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/get-user", get(accounts::get_user))
        .route("/add-note", post(notes::add_note))
        .route("/edit-note/{note_id}", put(notes::edit_note))
        .route(
            "/update-note-pinned/{note_id}",
            put(notes::update_note_pinned),
        )
        .route("/delete-note/{note_id}", delete(notes::delete_note))
        .route("/get-all-notes", get(notes::get_all_notes))
        .route("/search-notes", get(notes::search_notes))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let public = Router::new()
        .route("/create-account", post(accounts::create_account))
        .route("/login", post(accounts::login))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let request_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::create_account,
        accounts::login,
        accounts::get_user,
        notes::add_note,
        notes::edit_note,
        notes::update_note_pinned,
        notes::delete_note,
        notes::get_all_notes,
        notes::search_notes,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            UserId,
            NoteId,
            UserView,
            Note,
            CreateAccountRequest,
            LoginRequest,
            RegisterResponse,
            LoginResponse,
            UserResponse,
            AddNoteRequest,
            EditNoteRequest,
            UpdatePinnedRequest,
            NoteResponse,
            NotesResponse,
            MessageResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Registration, login and profile"),
        (name = "Notes", description = "Personal note management and search"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
