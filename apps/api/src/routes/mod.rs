pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extract::handlers as extract;
use crate::listings::handlers as listings;
use crate::profile::handlers as profile;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Listings
        .route("/api/v1/jobs", get(listings::handle_jobs))
        .route("/api/v1/internships", get(listings::handle_internships))
        .route("/api/v1/listings", get(listings::handle_all_listings))
        .route("/api/v1/featured/jobs", get(listings::handle_featured_jobs))
        .route(
            "/api/v1/featured/internships",
            get(listings::handle_featured_internships),
        )
        .route(
            "/api/v1/featured/companies",
            get(listings::handle_featured_companies),
        )
        // Session
        .route("/api/v1/auth/session", get(session::handle_session))
        .route("/api/v1/auth/login", post(session::handle_login))
        .route("/api/v1/auth/signup", post(session::handle_signup))
        .route("/api/v1/auth/logout", post(session::handle_logout))
        // AI tools
        .route("/api/v1/analysis/reset", post(analysis::handle_reset))
        .route("/api/v1/analysis/:task", post(analysis::handle_analysis))
        .route(
            "/api/v1/uploads/extract",
            post(extract::handle_extract).layer(upload_limit),
        )
        // Profile dashboard
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route(
            "/api/v1/profile/resumes",
            post(profile::handle_upload_resume).layer(upload_limit),
        )
        .route(
            "/api/v1/profile/resumes/:id",
            delete(profile::handle_delete_resume),
        )
        .route(
            "/api/v1/profile/resumes/:id/primary",
            patch(profile::handle_set_primary),
        )
        .route(
            "/api/v1/profile/coding-profiles",
            post(profile::handle_add_coding_profile),
        )
        .route(
            "/api/v1/profile/suggestions",
            post(profile::handle_suggestions),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::pipeline::testing::FakeGenerator;
    use crate::analysis::pipeline::{AnalysisPipeline, NOT_CONFIGURED_FEEDBACK};
    use crate::analysis::tracker::RequestTracker;
    use crate::config::Config;
    use crate::listings::ListingStore;
    use crate::profile::ProfileStore;
    use crate::session::store::MemoryStore;
    use crate::session::SessionContext;

    const BOUNDARY: &str = "talentx-test-boundary";

    async fn app_with(pipeline: AnalysisPipeline) -> Router {
        let sessions = SessionContext::initialize(Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        build_router(AppState {
            pipeline,
            requests: Arc::new(RequestTracker::new()),
            listings: Arc::new(ListingStore::with_mock_data(Duration::ZERO)),
            sessions: Arc::new(sessions),
            profiles: Arc::new(ProfileStore::new()),
            config: Config::from_lookup(|_| None).unwrap(),
        })
    }

    async fn app() -> Router {
        app_with(AnalysisPipeline::unconfigured()).await
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_req(uri: &str, file_name: &str, mime: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {mime}\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn login(app: &Router) {
        let (status, _) = send(
            app,
            json_req(
                "POST",
                "/api/v1/auth/login",
                json!({"email": "ada@example.com", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_ai_configuration() {
        let (status, body) = send(&app().await, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["aiConfigured"], false);
    }

    #[tokio::test]
    async fn test_listing_filters_via_query() {
        let app = app().await;
        let (status, body) = send(&app, get_req("/api/v1/listings?jobType=Internship")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(&app, get_req("/api/v1/jobs?keywords=python&location=remote")).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["5"]);
    }

    #[tokio::test]
    async fn test_unknown_job_type_is_rejected() {
        let (status, body) = send(&app().await, get_req("/api/v1/jobs?jobType=Gig")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_featured_companies_respects_limit() {
        let (_, body) = send(&app().await, get_req("/api/v1/featured/companies?limit=2")).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analysis_without_credential_reports_not_configured() {
        let (status, body) = send(
            &app().await,
            json_req(
                "POST",
                "/api/v1/analysis/resume-critique",
                json!({"resumeText": "Jane Doe"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feedback"], NOT_CONFIGURED_FEEDBACK);
    }

    #[tokio::test]
    async fn test_analysis_normalizes_match_reply() {
        let fake = Arc::new(FakeGenerator::replying(
            "```json\n{\"matchScore\": 82, \"feedback\": \"Good fit.\", \
             \"matchingElements\": [\"Rust\"], \"missingElements\": [\"Kubernetes\"]}\n```",
        ));
        let app = app_with(AnalysisPipeline::new(fake.clone())).await;
        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/analysis/percentage-match",
                json!({"resumeText": "Jane Doe, Rust", "jobDescription": "Rust + Kubernetes"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overallScore"], 82);
        assert!(body["feedback"].as_str().unwrap().starts_with("Match Score: 82%"));
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analysis_missing_input_never_calls_model() {
        let fake = Arc::new(FakeGenerator::replying("{}"));
        let app = app_with(AnalysisPipeline::new(fake.clone())).await;
        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/analysis/percentage-match",
                json!({"resumeText": "Jane Doe"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("job description"));
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let (status, _) = send(
            &app().await,
            json_req("POST", "/api/v1/analysis/horoscope", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_advances_generation() {
        let app = app().await;
        let req = || json_req("POST", "/api/v1/analysis/reset", json!({"contextId": "ats"}));
        let (_, first) = send(&app, req()).await;
        let (_, second) = send(&app, req()).await;
        assert_eq!(first["contextId"], "ats");
        assert_eq!(second["generation"], first["generation"].as_u64().unwrap() + 1);
    }

    #[tokio::test]
    async fn test_extract_plain_text_upload() {
        let (status, body) = send(
            &app().await,
            upload_req("/api/v1/uploads/extract", "cv.txt", "text/plain", "Jane Doe\nRust"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fileName"], "cv.txt");
        assert_eq!(body["text"], "Jane Doe\nRust");
    }

    #[tokio::test]
    async fn test_extract_rejects_unsupported_type() {
        let (status, body) = send(
            &app().await,
            upload_req("/api/v1/uploads/extract", "cv.png", "image/png", "binary"),
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            body["error"]["message"],
            "Unsupported file type: image/png. Please upload a PDF or TXT file."
        );
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = app().await;
        let (_, body) = send(&app, get_req("/api/v1/auth/session")).await;
        assert_eq!(body["isAuthenticated"], false);

        login(&app).await;
        let (_, body) = send(&app, get_req("/api/v1/auth/session")).await;
        assert_eq!(body["isAuthenticated"], true);
        assert_eq!(body["user"]["email"], "ada@example.com");

        let (status, _) = send(&app, json_req("POST", "/api/v1/auth/logout", json!({}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, get_req("/api/v1/auth/session")).await;
        assert_eq!(body["isAuthenticated"], false);
    }

    #[tokio::test]
    async fn test_signup_validates_credentials() {
        let (status, body) = send(
            &app().await,
            json_req(
                "POST",
                "/api/v1/auth/signup",
                json!({"email": "ada@example.com", "password": "secret1", "confirmPassword": "secret2"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Passwords do not match.");
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let (status, body) = send(&app().await, get_req("/api/v1/profile")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_profile_resume_management() {
        let app = app().await;
        login(&app).await;

        let (status, uploaded) = send(
            &app,
            upload_req("/api/v1/profile/resumes", "new.txt", "text/plain", "Ada Lovelace"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(uploaded["isPrimary"], false);

        let id = uploaded["id"].as_str().unwrap();
        let (_, resumes) = send(
            &app,
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/v1/profile/resumes/{id}/primary"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        let primaries: Vec<&Value> = resumes
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["isPrimary"] == true)
            .collect();
        assert_eq!(primaries.len(), 1);
        assert_eq!(primaries[0]["id"], id);

        let (status, _) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/profile/resumes/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_suggestions_use_primary_resume() {
        let fake = Arc::new(FakeGenerator::replying(
            r#"{"feedback": "Quantify impact.", "suggestions": ["Add metrics"]}"#,
        ));
        let app = app_with(AnalysisPipeline::new(fake.clone())).await;
        login(&app).await;

        let (status, body) = send(
            &app,
            json_req("POST", "/api/v1/profile/suggestions", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"], json!(["Add metrics"]));
        assert!(fake.prompts.lock().unwrap()[0].contains("Software Engineer"));
    }

    #[tokio::test]
    async fn test_add_coding_profile() {
        let app = app().await;
        login(&app).await;
        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/profile/coding-profiles",
                json!({"platform": "CodeChef", "username": "ada"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["url"], "https://example.com/codechef/ada");
    }
}
