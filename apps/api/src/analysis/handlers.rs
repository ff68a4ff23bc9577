use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::models::{AnalysisRequest, AnalysisResult, AnalysisTask, SecondaryInput};
use crate::analysis::DEFAULT_CONTEXT;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBody {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
    pub job_role: Option<String>,
    pub context_id: Option<String>,
}

impl AnalysisBody {
    fn context(&self) -> &str {
        self.context_id
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CONTEXT)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetBody {
    pub context_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub context_id: String,
    pub generation: u64,
}

fn parse_task(slug: &str) -> Result<AnalysisTask, AppError> {
    AnalysisTask::from_slug(slug).ok_or_else(|| {
        let known: Vec<&str> = AnalysisTask::ALL.iter().map(|t| t.slug()).collect();
        AppError::NotFound(format!(
            "Unknown analysis task '{slug}'. Expected one of: {}",
            known.join(", ")
        ))
    })
}

/// POST /api/v1/analysis/:task
pub async fn handle_analysis(
    State(state): State<AppState>,
    Path(task): Path<String>,
    Json(body): Json<AnalysisBody>,
) -> Result<Json<AnalysisResult>, AppError> {
    let task = parse_task(&task)?;
    let context = body.context().to_string();

    let secondary = match task.secondary_input() {
        Some(SecondaryInput::JobDescription) => body.job_description,
        Some(SecondaryInput::JobRole) => body.job_role,
        None => None,
    };
    let request = AnalysisRequest::new(task, body.resume_text, secondary)?;

    info!(?task, context = %context, "Analysis requested");
    let result = state
        .requests
        .run(&context, state.pipeline.run(&request))
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/analysis/reset
///
/// Clears a panel: any request still in flight for the context is superseded.
pub async fn handle_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetBody>,
) -> Json<ResetResponse> {
    let context_id = body
        .context_id
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTEXT.to_string());
    let generation = state.requests.advance(&context_id);
    Json(ResetResponse {
        context_id,
        generation,
    })
}
