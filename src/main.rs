// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::application::analysis_service::AnalysisService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::subprocess_analyzer::SubprocessAnalyzer;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::api_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create the analysis bridge (infrastructure layer)
    let analyzer = Arc::new(SubprocessAnalyzer::new(
        app_config.analyzer.command.clone(),
        app_config.analyzer.args.clone(),
        app_config.analyzer.scratch_dir.clone(),
        app_config.analyzer.time_limit(),
    ));

    // Create services (application layer)
    let analysis_service = AnalysisService::new(analyzer);

    // Create application state
    let state = Arc::new(AppState { analysis_service });

    // Build router (presentation layer)
    let router = api_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = app_config.server.bind.parse()?;
    println!("Starting instant-analysis service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
