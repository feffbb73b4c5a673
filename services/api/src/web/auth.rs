//! services/api/src/web/auth.rs
//!
//! Sign-in, sign-out, and current-user endpoints. There is no password:
//! signing in with an email creates the profile's user record, and the
//! presence of that record is what "signed in" means.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use promail_core::domain::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub points: u32,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            points: user.points,
            is_admin: user.is_admin,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signin - Sign in and create the profile's user record
///
/// Mirrors the login form, which is only reachable while signed out: a fresh
/// user record is written with the full daily grant.
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 201, description = "Signed in", body = UserResponse),
        (status = 400, description = "Invalid email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signin_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SigninRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate the email before touching the account manager; its
    //    constructor does not re-check.
    if !req.email.contains('@') {
        return Err((
            StatusCode::BAD_REQUEST,
            "A valid email address is required".to_string(),
        ));
    }

    // 2. Create and persist the user record.
    let user = state.accounts.create(&req.email).await.map_err(|e| {
        error!("Failed to create user: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to sign in".to_string(),
        )
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /me - Read the current user, applying the daily reset check
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The signed-in user", body = UserResponse),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state
        .accounts
        .load()
        .await
        .map_err(|e| {
            error!("Failed to load user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load user".to_string(),
            )
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "Not signed in".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// POST /auth/signout - Remove the user record; the logs are kept
#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 200, description = "Signed out"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state.accounts.clear().await.map_err(|e| {
        error!("Failed to sign out: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to sign out".to_string(),
        )
    })?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::state::test_fixtures::app_state;
    use promail_core::DAILY_POINTS;

    #[tokio::test]
    async fn signin_rejects_an_email_without_an_at_sign() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());

        let result = signin_handler(
            State(state.clone()),
            Json(SigninRequest { email: "not-an-email".to_string() }),
        )
        .await;

        let (status, _) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.accounts.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn signin_persists_a_user_with_the_daily_grant() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());

        let result = signin_handler(
            State(state.clone()),
            Json(SigninRequest { email: "alice@example.com".to_string() }),
        )
        .await;
        assert!(result.is_ok());

        let user = state.accounts.load().await.unwrap().unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.points, DAILY_POINTS);
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn signout_clears_the_user_record() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());
        state.accounts.create("alice@example.com").await.unwrap();

        signout_handler(State(state.clone())).await.unwrap();
        assert!(state.accounts.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn me_requires_a_signed_in_user() {
        let dir = tempfile::tempdir().unwrap();
        let state = app_state(dir.path());

        let (status, _) = me_handler(State(state)).await.err().unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
