//! URL validation and ELN resolution for the URL import form.

use adapter_client::AdapterRequest;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::messages::UserMessage;

/// A URL the form accepts: non-empty, with both a scheme and a host.
pub fn is_valid_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        debug!("URL validation failed: empty URL");
        return false;
    }

    let is_valid = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| !host.is_empty()),
        Err(e) => {
            debug!(url, error = %e, "URL validation failed: unparseable");
            false
        }
    };
    debug!(url, is_valid, "URL validation result");
    is_valid
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElnHostsError {
    #[error("Invalid ELN host entry '{0}', expected host=plugin")]
    InvalidEntry(String),
}

/// Which ELN plugin handles experiment URLs from which host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElnHosts(Vec<(String, String)>);

impl ElnHosts {
    /// Parse `host=plugin[,host=plugin...]`
    pub fn parse(entries: &str) -> Result<Self, ElnHostsError> {
        let mut hosts = Vec::new();
        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (host, plugin) = entry
                .split_once('=')
                .map(|(h, p)| (h.trim(), p.trim()))
                .filter(|(h, p)| !h.is_empty() && !p.is_empty())
                .ok_or_else(|| ElnHostsError::InvalidEntry(entry.to_string()))?;
            hosts.push((host.to_ascii_lowercase(), plugin.to_string()));
        }
        Ok(Self(hosts))
    }

    pub fn plugin_for(&self, host: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h.eq_ignore_ascii_case(host))
            .map(|(_, plugin)| plugin.as_str())
    }
}

impl Default for ElnHosts {
    fn default() -> Self {
        Self(vec![(
            "elab.tu-clausthal.de".to_string(),
            "eLabFTW".to_string(),
        )])
    }
}

/// Turn an experiment URL into an adapter request without touching the network.
pub fn resolve_url_request(url: &str, hosts: &ElnHosts) -> Result<AdapterRequest, UserMessage> {
    let parsed = Url::parse(url.trim()).map_err(|_| UserMessage::error("error-invalid-url"))?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| UserMessage::error("error-invalid-url"))?;

    let plugin = hosts
        .plugin_for(host)
        .ok_or_else(|| UserMessage::error("error-unsupported-eln").with_param(host))?;

    if parsed.query().map_or(true, str::is_empty) {
        return Err(UserMessage::error("error-missing-query"));
    }

    let id = parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| UserMessage::error("error-missing-id"))?;

    Ok(AdapterRequest::new(plugin, id))
}
