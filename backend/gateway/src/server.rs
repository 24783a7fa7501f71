//! Main HTTP Gateway Server.

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use textgrab_core::{Summarizer, SummaryOptions, Translator};
use textgrab_understanding::Annotator;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::api;
use crate::rate_limit::RateLimiter;

/// Application state shared across routes.
///
/// A capability left as `None` is disabled; requests asking for it fail
/// with 400.
#[derive(Clone)]
pub struct GatewayState {
    pub annotator: Annotator,
    pub summarizer: Option<Arc<dyn Summarizer>>,
    pub translator: Option<Arc<dyn Translator>>,
    pub summary_options: SummaryOptions,
    pub rate_limiter: RateLimiter,
    pub max_body_bytes: usize,
}

/// Vision's JSON request ceiling.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

impl GatewayState {
    pub fn new(annotator: Annotator, rate_limiter: RateLimiter) -> Self {
        Self {
            annotator,
            summarizer: None,
            translator: None,
            summary_options: SummaryOptions::default(),
            rate_limiter,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_summary_options(mut self, options: SummaryOptions) -> Self {
        self.summary_options = options;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/new_session", get(api::new_session))
        .route("/process", post(api::process))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Starts the HTTP server and runs until ctrl-c.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let pruner = state.rate_limiter.spawn_pruner();
    info!(
        ocr = state.annotator.provider_name(),
        summarizer = state.summarizer.as_ref().map(|s| s.name()).unwrap_or("disabled"),
        translator = state.translator.as_ref().map(|t| t.name()).unwrap_or("disabled"),
        "Providers ready"
    );

    let app = build_router(state);

    info!("TextGrab API listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pruner.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
