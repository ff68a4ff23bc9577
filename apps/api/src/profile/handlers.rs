use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::analysis::models::{AnalysisRequest, AnalysisResult, AnalysisTask};
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::extract::handlers::read_upload;
use crate::models::profile::{CodingProfile, Platform, Profile, ResumeFile};
use crate::profile::ProfileError;
use crate::session::handlers::CurrentUser;
use crate::state::AppState;

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::ResumeNotFound(_) => AppError::NotFound(e.to_string()),
            ProfileError::EmptyUsername | ProfileError::NoResumeText => {
                AppError::Validation(e.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewCodingProfile {
    pub platform: Platform,
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsBody {
    pub resume_text: Option<String>,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Profile> {
    Json(state.profiles.profile(&user.email).await)
}

/// POST /api/v1/profile/resumes
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeFile>), AppError> {
    let file = read_upload(multipart).await?;
    let content = extract_text(&file).await?;
    let resume = state
        .profiles
        .add_resume(&user.email, &file.file_name, content)
        .await;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// PATCH /api/v1/profile/resumes/:id/primary
pub async fn handle_set_primary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<ResumeFile>>, AppError> {
    Ok(Json(state.profiles.set_primary(&user.email, &id).await?))
}

/// DELETE /api/v1/profile/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<ResumeFile>>, AppError> {
    Ok(Json(state.profiles.delete_resume(&user.email, &id).await?))
}

/// POST /api/v1/profile/coding-profiles
pub async fn handle_add_coding_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewCodingProfile>,
) -> Result<(StatusCode, Json<CodingProfile>), AppError> {
    let entry = state
        .profiles
        .add_coding_profile(&user.email, body.platform, &body.username)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/v1/profile/suggestions
///
/// Runs on the pasted text when given, otherwise on the primary resume.
pub async fn handle_suggestions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SuggestionsBody>,
) -> Result<Json<AnalysisResult>, AppError> {
    let text = state
        .profiles
        .suggestion_source(&user.email, body.resume_text)
        .await?;
    let request = AnalysisRequest::new(AnalysisTask::ResumeSuggestions, Some(text), None)?;

    let context = format!("profile:{}", user.email);
    let result = state
        .requests
        .run(&context, state.pipeline.run(&request))
        .await?;
    Ok(Json(result))
}
