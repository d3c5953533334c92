//! Application setup and server configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    routing::get,
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::auth::SessionStore;
use crate::server::middleware::session_layer;
use crate::server::routes::{health_handler, import_page_get, import_page_post};
use crate::server::static_files::serve_asset;

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub server_deps: Arc<ServerDeps>,
    /// Where multipart uploads are staged before they are moved
    pub staging_dir: PathBuf,
}

/// Router-level settings that are not handler dependencies
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub max_upload_bytes: usize,
    pub staging_dir: PathBuf,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * 1024 * 1024,
            staging_dir: std::env::temp_dir(),
            secure_cookies: false,
        }
    }
}

/// Build the Axum application router
pub fn build_app(
    server_deps: ServerDeps,
    sessions: SessionStore,
    options: AppOptions,
) -> Router {
    let app_state = AxumAppState {
        server_deps: Arc::new(server_deps),
        staging_dir: options.staging_dir,
    };

    Router::new()
        .route(
            "/",
            get(import_page_get)
                .post(import_page_post)
                // Only the import page needs a session
                .layer(session_layer(sessions, options.secure_cookies)),
        )
        .route("/health", get(health_handler))
        .route("/assets/*path", get(serve_asset))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(options.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}
