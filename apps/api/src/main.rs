mod analysis;
mod config;
mod errors;
mod extract;
mod listings;
mod llm_client;
mod models;
mod profile;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::pipeline::AnalysisPipeline;
use crate::analysis::tracker::RequestTracker;
use crate::config::{Config, SessionBackend};
use crate::listings::ListingStore;
use crate::llm_client::GeminiClient;
use crate::profile::ProfileStore;
use crate::routes::build_router;
use crate::session::store::{FileStore, KeyValueStore, MemoryStore, RedisStore};
use crate::session::SessionContext;
use crate::state::AppState;

const REDIS_KEY_PREFIX: &str = "talentx:";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentX API v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = build_pipeline(&config)?;

    let store = build_session_store(&config.session_backend)?;
    let sessions = SessionContext::initialize(store).await?;

    let state = AppState {
        pipeline,
        requests: Arc::new(RequestTracker::new()),
        listings: Arc::new(ListingStore::with_mock_data(config.listing_latency)),
        sessions: Arc::new(sessions),
        profiles: Arc::new(ProfileStore::new()),
        config: config.clone(),
    };

    // TODO: restrict CORS to the front-end origin once it is configurable
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_pipeline(config: &Config) -> Result<AnalysisPipeline> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        warn!("GEMINI_API_KEY is not set; AI features will report that they are not configured");
        return Ok(AnalysisPipeline::unconfigured());
    };

    let client = GeminiClient::new(api_key, config.gemini_model.clone(), config.llm_timeout)?
        .with_base_url(config.gemini_api_url.clone());
    info!("LLM client initialized (model: {})", client.model());
    Ok(AnalysisPipeline::new(Arc::new(client)))
}

fn build_session_store(backend: &SessionBackend) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match backend {
        SessionBackend::Memory => Arc::new(MemoryStore::new()),
        SessionBackend::File(path) => {
            info!("Session store: {}", path.display());
            Arc::new(FileStore::new(path.clone()))
        }
        SessionBackend::Redis(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Session store: Redis client initialized");
            Arc::new(RedisStore::new(client, REDIS_KEY_PREFIX))
        }
    };
    Ok(store)
}
