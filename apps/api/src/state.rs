use std::sync::Arc;

use crate::analysis::pipeline::AnalysisPipeline;
use crate::analysis::tracker::RequestTracker;
use crate::config::Config;
use crate::listings::ListingStore;
use crate::profile::ProfileStore;
use crate::session::SessionContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: AnalysisPipeline,
    /// Generation counters for in-flight AI requests, one per client context.
    pub requests: Arc<RequestTracker>,
    pub listings: Arc<ListingStore>,
    pub sessions: Arc<SessionContext>,
    pub profiles: Arc<ProfileStore>,
    pub config: Config,
}
