// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::ApiJson;
use crate::{
    auth::Auth,
    error::{ApiError, ServiceError, ServiceResult},
    models::{
        CreateAccountRequest, LoginRequest, LoginResponse, RegisterResponse, UserResponse,
    },
    state::AppState,
};

/// Run a password-hashing operation on the blocking pool.
async fn blocking<T, F>(state: AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(AppState) -> ServiceResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || op(state)).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!(error = %e, "blocking account task failed");
            Err(ApiError::internal())
        }
    }
}

#[utoipa::path(
    post,
    path = "/create-account",
    request_body = CreateAccountRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "Account created, or `error: true` if the email is taken", body = RegisterResponse),
        (status = 400, description = "Missing field")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let registration = blocking(state, move |state| {
        state.accounts().register(
            request.full_name.as_deref(),
            request.email.as_deref(),
            request.password.as_deref(),
        )
    })
    .await?;

    Ok(Json(RegisterResponse {
        error: false,
        message: "Registration Successful".to_string(),
        user: registration.user,
        access_token: registration.token.token,
    }))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Accounts",
    responses(
        (status = 200, body = LoginResponse),
        (status = 400, description = "Missing field, unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = blocking(state, move |state| {
        state
            .accounts()
            .login(request.email.as_deref(), request.password.as_deref())
    })
    .await?;

    Ok(Json(LoginResponse {
        error: false,
        message: "Login Successful".to_string(),
        user_id: outcome.user_id,
        email: outcome.email,
        access_token: outcome.token.token,
    }))
}

#[utoipa::path(
    get,
    path = "/get-user",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UserResponse),
        (status = 401, description = "Missing or invalid token, or the account no longer exists")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserResponse>, ApiError> {
    let view = state
        .accounts()
        .current_user(user.user_id)
        .map_err(|e| match e {
            // A valid token for an account that is gone is an auth failure.
            ServiceError::NotFound(n) => {
                ApiError::unauthorized(n.to_string()).with_code("user_not_found")
            }
            other => other.into(),
        })?;

    Ok(Json(UserResponse {
        error: false,
        message: "User retrieved successfully".to_string(),
        user: view,
    }))
}
