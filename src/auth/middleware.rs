// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the protected router subtree. It is the single place where the
//! caller identity is established: on success the `AuthenticatedUser` is
//! added to request extensions, on failure the request is answered with 401
//! and the handler never runs.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/get-all-notes", get(notes::list_notes))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_auth,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::bearer_token;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(request.headers()).and_then(|token| state.tokens.verify(token));

    match verified {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::info!(
                target: "audit",
                error_code = e.error_code(),
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Auth;
    use crate::models::UserId;
    use crate::state::test_support::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn whoami(Auth(user): Auth) -> String {
        user.user_id.to_string()
    }

    fn guarded(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_auth,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn request_without_token_is_rejected_before_handler() {
        let (state, _temp_dir) = test_state();
        let response = guarded(state)
            .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["errorCode"], "missing_token");
    }

    #[tokio::test]
    async fn request_with_valid_token_reaches_handler() {
        let (state, _temp_dir) = test_state();
        let user_id = UserId::new();
        let issued = state.tokens.issue(user_id).unwrap();

        let response = guarded(state)
            .oneshot(
                Request::get("/whoami")
                    .header("Authorization", format!("Bearer {}", issued.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (state, _temp_dir) = test_state();
        let long_ago = chrono::Utc::now() - chrono::Duration::days(400);
        let issued = state.tokens.issue_at(UserId::new(), long_ago).unwrap();

        let response = guarded(state)
            .oneshot(
                Request::get("/whoami")
                    .header("Authorization", format!("Bearer {}", issued.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["errorCode"], "token_expired");
    }
}
