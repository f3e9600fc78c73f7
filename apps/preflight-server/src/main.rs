//! Print Preflight Server
//!
//! Checks print-ready book submissions against the printer's production
//! rules. A client uploads the interior (content) PDF and the cover PDF
//! together with the chosen trim size, bleed and paper stock; the server
//! answers with the ordered errors, warnings and passed checks.
//!
//! ## Architecture
//!
//! - `shared-pdf` reduces each upload to its first-page size and page count
//! - `preflight-engine` compares that geometry with the expected boxes
//! - this crate handles transport, rate limiting and configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use preflight_engine::{Locale, SpecCatalog, ValidationEngine};

mod api;
mod error;

use api::{handle_health, handle_list_specs, handle_validate};

/// Command-line arguments for the preflight server
#[derive(Parser, Debug)]
#[command(name = "preflight-server")]
#[command(about = "Print preflight server for book content and cover PDFs")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// PDF extraction timeout in milliseconds
    #[arg(long, default_value = "10000")]
    timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Maximum size of an upload request in megabytes
    #[arg(long, default_value = "64")]
    max_upload_mb: usize,

    /// JSON file with trim sizes and paper types replacing the built-in tables
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Language of report messages (en, he)
    #[arg(long, default_value = "en")]
    locale: Locale,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ValidationEngine>,
    /// PDF extraction timeout in milliseconds
    pub timeout_ms: u64,
}

/// Upload cap in bytes, saturating on absurd `--max-upload-mb` values
pub fn upload_limit_bytes(max_upload_mb: usize) -> usize {
    max_upload_mb.saturating_mul(1024 * 1024)
}

/// Routes and the layers every deployment needs; rate limiting is added in `main`
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/specs", get(handle_list_specs))
        .route("/api/validate", post(handle_validate))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting preflight server on {}:{}", args.host, args.port);

    let catalog = match &args.catalog {
        Some(path) => SpecCatalog::from_json_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => SpecCatalog::standard(),
    };
    info!(
        "Catalog: {} trim size(s), {} paper type(s)",
        catalog.trim_sizes().len(),
        catalog.paper_types().len()
    );

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit.saturating_mul(2))
            .finish()
            .context("invalid rate limit configuration")?,
    );

    // Create shared state
    let state = AppState {
        engine: Arc::new(ValidationEngine::new(catalog).with_locale(args.locale)),
        timeout_ms: args.timeout_ms,
    };

    let app = build_router(state, upload_limit_bytes(args.max_upload_mb)).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Extraction timeout: {}ms", args.timeout_ms);
    info!("Report locale: {}", args.locale);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
