use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::listings::{
    ListingFilter, ListingScope, DEFAULT_FEATURED_COMPANIES, DEFAULT_FEATURED_INTERNSHIPS,
    DEFAULT_FEATURED_JOBS,
};
use crate::models::listing::{Company, JobListing, JobType};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

impl ListingQuery {
    fn into_filter(self) -> Result<ListingFilter, AppError> {
        let job_type = match self.job_type.filter(|t| !t.is_empty()) {
            Some(label) => Some(
                label
                    .parse::<JobType>()
                    .map_err(|e| AppError::Validation(e.to_string()))?,
            ),
            None => None,
        };
        Ok(ListingFilter::new(self.keywords, self.location, job_type))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

async fn search(
    state: &AppState,
    scope: ListingScope,
    query: ListingQuery,
) -> Result<Json<Vec<JobListing>>, AppError> {
    let filter = query.into_filter()?;
    Ok(Json(state.listings.search(scope, &filter).await))
}

/// GET /api/v1/jobs
pub async fn handle_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    search(&state, ListingScope::Jobs, query).await
}

/// GET /api/v1/internships
pub async fn handle_internships(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    search(&state, ListingScope::Internships, query).await
}

/// GET /api/v1/listings
pub async fn handle_all_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    search(&state, ListingScope::All, query).await
}

/// GET /api/v1/featured/jobs
pub async fn handle_featured_jobs(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<JobListing>> {
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED_JOBS);
    Json(state.listings.featured(ListingScope::Jobs, limit).await)
}

/// GET /api/v1/featured/internships
pub async fn handle_featured_internships(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<JobListing>> {
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED_INTERNSHIPS);
    Json(state.listings.featured(ListingScope::Internships, limit).await)
}

/// GET /api/v1/featured/companies
pub async fn handle_featured_companies(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Company>> {
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED_COMPANIES);
    Json(state.listings.featured_companies(limit).await)
}
