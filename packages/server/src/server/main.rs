// Main entry point for the ELN adapter UI server

use std::sync::Arc;

use adapter_client::AdapterClient;
use anyhow::{Context, Result};
use eln_adapter_ui::{
    common::MessageCatalog,
    kernel::{start_scheduler, AdapterServiceClient, ServerDeps},
    server::{auth::SessionStore, build_app, AppOptions},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,eln_adapter_ui=debug,adapter_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ELN adapter UI");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        adapter_service_url = %config.adapter_service_url,
        wiki_url = %config.wiki_url,
        "Configuration loaded"
    );

    let messages = MessageCatalog::load(config.messages_path.as_deref())
        .context("Failed to load message catalog")?;

    let client = AdapterClient::new(config.adapter_service_url.clone())
        .context("Failed to create adapter service client")?;

    match client.check_status().await {
        Some(status) => tracing::info!(
            version = status.version.as_deref().unwrap_or("unknown"),
            plugins = ?status.enabled_plugins,
            "Adapter service reachable"
        ),
        None => tracing::warn!("Adapter service not reachable at startup"),
    }

    let server_deps = ServerDeps::from_config(
        &config,
        Arc::new(AdapterServiceClient::new(Arc::new(client))),
        Arc::new(messages),
    );

    let sessions = SessionStore::new();
    let _scheduler = start_scheduler(sessions.clone())
        .await
        .context("Failed to start scheduled tasks")?;

    // Build application
    let app = build_app(
        server_deps,
        sessions,
        AppOptions {
            max_upload_bytes: config.max_upload_bytes,
            secure_cookies: config.secure_cookies,
            ..AppOptions::default()
        },
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
