//! Dialog Gateway server binary.
//!
//! Loads configuration, constructs one client handle per collaborator, and
//! serves the message endpoint alongside the static chat UI.

use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use dialog_gateway::adapters::dialog::{DialogClient, DialogClientConfig};
use dialog_gateway::adapters::http::message::{message_router, MessageAppState};
use dialog_gateway::adapters::search::{SearchClient, SearchClientConfig};
use dialog_gateway::application::{MessageRouter, RouterSettings};
use dialog_gateway::config::AppConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server.log_level);

    if config.dialog.resolved_workspace_id().is_none() {
        tracing::warn!(
            "no workspace identifier configured; the message endpoint will answer with setup guidance"
        );
    }

    // One stateless client handle per collaborator, constructed once and
    // shared by reference across requests
    let dialog = Arc::new(DialogClient::new(
        DialogClientConfig::new(
            &config.dialog.base_url,
            &config.dialog.username,
            config.dialog.password(),
        )
        .with_version(&config.dialog.version)
        .with_timeout(config.dialog.timeout()),
    ));
    let search = Arc::new(SearchClient::new(
        SearchClientConfig::new(
            &config.search.base_url,
            &config.search.username,
            config.search.password(),
        )
        .with_version(&config.search.version)
        .with_timeout(config.search.timeout()),
    ));

    let router = Arc::new(MessageRouter::new(
        dialog,
        search,
        RouterSettings {
            workspace_id: config.dialog.resolved_workspace_id().map(str::to_string),
            environment_id: config.search.environment_id.clone(),
            collection_id: config.search.collection_id.clone(),
        },
    ));

    let app = message_router()
        .with_state(MessageAppState::new(router))
        .fallback_service(ServeDir::new(&config.server.public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server.cors_origins_list()));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dialog gateway listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
