//! REST client for the ELN-to-SMW adapter service
//!
//! The adapter service turns electronic lab notebook experiments into
//! Semantic MediaWiki pages. This crate only speaks its two endpoints:
//!
//! - `GET /status` reports version, plugins and the upload directory
//! - `POST /adapt` imports one experiment or uploaded file
//!
//! # Example
//!
//! ```rust,ignore
//! use adapter_client::{AdapterClient, AdaptOutcome};
//!
//! let client = AdapterClient::new("https://adapter.example.org")?;
//!
//! if let Some(status) = client.check_status().await {
//!     println!("plugins: {:?}", status.enabled_plugins);
//! }
//!
//! match client.adapt("eLabFTW", "1234").await {
//!     AdaptOutcome::Ok(response) => println!("{} pages", response.smw_pages.len()),
//!     other => println!("failed: {:?}", other.message_key()),
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{
    AdaptOutcome, AdapterError, Result, KEY_INVALID_RESPONSE, KEY_SERVICE_ERROR,
    KEY_SERVICE_OFFLINE,
};
pub use types::*;

use std::time::Duration;

use reqwest::{header, redirect, Client, StatusCode};
use tracing::{debug, error, info, warn};

/// Fixed user agent sent with every request.
pub const USER_AGENT: &str = concat!("ELNSMWAdapterUI/", env!("CARGO_PKG_VERSION"));

const STATUS_TIMEOUT: Duration = Duration::from_secs(5);
const STATUS_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const ADAPT_TIMEOUT: Duration = Duration::from_secs(30);
const ADAPT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Adapter service client.
#[derive(Clone)]
pub struct AdapterClient {
    status_client: Client,
    adapt_client: Client,
    base_url: String,
}

/// Builder for [`AdapterClient`] with overridable timeouts.
#[derive(Debug, Clone)]
pub struct AdapterClientBuilder {
    base_url: String,
    status_timeout: Duration,
    status_connect_timeout: Duration,
    adapt_timeout: Duration,
    adapt_connect_timeout: Duration,
}

impl AdapterClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            status_timeout: STATUS_TIMEOUT,
            status_connect_timeout: STATUS_CONNECT_TIMEOUT,
            adapt_timeout: ADAPT_TIMEOUT,
            adapt_connect_timeout: ADAPT_CONNECT_TIMEOUT,
        }
    }

    pub fn status_timeout(mut self, total: Duration, connect: Duration) -> Self {
        self.status_timeout = total;
        self.status_connect_timeout = connect;
        self
    }

    pub fn adapt_timeout(mut self, total: Duration, connect: Duration) -> Self {
        self.adapt_timeout = total;
        self.adapt_connect_timeout = connect;
        self
    }

    pub fn build(self) -> Result<AdapterClient> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AdapterError::Config("adapter base URL is empty".into()));
        }

        // TLS peer verification stays at reqwest's default (on).
        let status_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.status_timeout)
            .connect_timeout(self.status_connect_timeout)
            .build()
            .map_err(|e| AdapterError::Config(format!("Failed to build status client: {}", e)))?;

        let adapt_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.adapt_timeout)
            .connect_timeout(self.adapt_connect_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| AdapterError::Config(format!("Failed to build adapt client: {}", e)))?;

        Ok(AdapterClient {
            status_client,
            adapt_client,
            base_url,
        })
    }
}

impl AdapterClient {
    /// Create a client with the default timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        AdapterClientBuilder::new(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> AdapterClientBuilder {
        AdapterClientBuilder::new(base_url)
    }

    /// Get the base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Poll `GET /status`.
    ///
    /// Returns `None` on any failure; callers treat that as "service unavailable".
    pub async fn check_status(&self) -> Option<ServiceStatus> {
        let url = format!("{}/status", self.base_url);

        let response = match self
            .status_client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Adapter status request failed");
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, http_code = status.as_u16(), "Adapter status not OK");
            return None;
        }

        match response.json::<ServiceStatus>().await {
            Ok(service_status) => {
                debug!(
                    url = %url,
                    version = service_status.version.as_deref().unwrap_or("unknown"),
                    plugins = service_status.plugins.len(),
                    "Adapter status"
                );
                Some(service_status)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Adapter status body could not be decoded");
                None
            }
        }
    }

    /// Import one experiment or file. Never fails past this boundary.
    pub async fn adapt(&self, eln: &str, id: &str) -> AdaptOutcome {
        self.try_adapt(&AdapterRequest::new(eln, id)).await.into()
    }

    /// `POST /adapt`, with the failure kept as an [`AdapterError`].
    pub async fn try_adapt(&self, request: &AdapterRequest) -> Result<AdapterResponse> {
        let url = format!("{}/adapt", self.base_url);

        info!(url = %url, eln = %request.eln, id = %request.id, "Calling adapter service");

        let response = self
            .adapt_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, timeout = e.is_timeout(), "Adapter request failed");
                AdapterError::ServiceUnavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to read adapter response body");
            AdapterError::ServiceUnavailable(e.to_string())
        })?;

        if status != StatusCode::OK {
            warn!(http_code = status.as_u16(), response = %body, "HTTP error from adapter service");
            return Err(AdapterError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            error!(response = %body, json_error = %e, "Invalid JSON response from adapter service");
            AdapterError::InvalidJson(e.to_string())
        })?;

        Ok(AdapterResponse::from(value))
    }
}
