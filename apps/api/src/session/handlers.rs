use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};

use crate::errors::AppError;
use crate::models::user::User;
use crate::session::{issue_token, CredentialError, Credentials, SessionState};
use crate::state::AppState;

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Extracts the logged-in user, rejecting with 401 when the session is unauthenticated.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        state
            .sessions
            .current_user()
            .await
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// GET /api/v1/auth/session
pub async fn handle_session(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.sessions.snapshot().await)
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SessionState>, AppError> {
    credentials.validate(false)?;
    let session = state
        .sessions
        .login(&credentials.email, &issue_token())
        .await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SessionState>, AppError> {
    credentials.validate(true)?;
    let session = state
        .sessions
        .signup(&credentials.email, &issue_token())
        .await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.sessions.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}
