use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::domains::import::{ElnHosts, PageFilter};

const DEFAULT_ELN_HOSTS: &str = "elab.tu-clausthal.de=eLabFTW";
const DEFAULT_PAGE_ID_PREFIX: &str = "P";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the adapter service (`/status`, `/adapt` are appended)
    pub adapter_service_url: String,
    /// Public prefix for links to created wiki pages
    pub wiki_url: String,
    pub port: u16,
    pub page_filter: PageFilter,
    pub eln_hosts: ElnHosts,
    /// Optional JSON file overriding the built-in message texts
    pub messages_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    /// Usage manual linked from the selection form
    pub manual_url: Option<String>,
    /// Send the session cookie over HTTPS only
    pub secure_cookies: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let adapter_service_url = lookup("ADAPTER_SERVICE_URL")
            .filter(|v| !v.trim().is_empty())
            .context("ADAPTER_SERVICE_URL must be set")?;
        let wiki_url = lookup("WIKI_URL")
            .filter(|v| !v.trim().is_empty())
            .context("WIKI_URL must be set")?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let page_filter = PageFilter::from_prefix(
            &lookup("PAGE_ID_PREFIX").unwrap_or_else(|| DEFAULT_PAGE_ID_PREFIX.to_string()),
        );

        let eln_hosts = ElnHosts::parse(
            &lookup("ELN_HOSTS").unwrap_or_else(|| DEFAULT_ELN_HOSTS.to_string()),
        )
        .context("ELN_HOSTS must be a comma-separated list of host=plugin pairs")?;

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse()
                .context("MAX_UPLOAD_BYTES must be a valid number")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let secure_cookies = match lookup("SESSION_COOKIE_SECURE") {
            Some(v) => parse_flag(&v).context("SESSION_COOKIE_SECURE must be true or false")?,
            None => false,
        };

        Ok(Self {
            adapter_service_url: adapter_service_url.trim().to_string(),
            wiki_url: wiki_url.trim().trim_end_matches('/').to_string(),
            port,
            page_filter,
            eln_hosts,
            messages_path: lookup("MESSAGES_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            max_upload_bytes,
            manual_url: lookup("MANUAL_URL").filter(|v| !v.is_empty()),
            secure_cookies,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}
