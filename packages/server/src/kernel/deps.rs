//! Server dependencies for request handlers (using traits for testability)
//!
//! All external services use trait abstractions to enable testing.

use adapter_client::{AdaptOutcome, AdapterClient, ServiceStatus};
use async_trait::async_trait;
use std::sync::Arc;

use crate::common::MessageCatalog;
use crate::config::Config;
use crate::domains::import::{ElnHosts, PageFilter};
use crate::kernel::BaseAdapterService;

// =============================================================================
// AdapterClient Adapter (implements BaseAdapterService trait)
// =============================================================================

/// Wrapper around AdapterClient that implements BaseAdapterService trait
pub struct AdapterServiceClient(pub Arc<AdapterClient>);

impl AdapterServiceClient {
    pub fn new(client: Arc<AdapterClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseAdapterService for AdapterServiceClient {
    async fn check_status(&self) -> Option<ServiceStatus> {
        self.0.check_status().await
    }

    async fn adapt(&self, eln: &str, id: &str) -> AdaptOutcome {
        self.0.adapt(eln, id).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by all request handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub adapter: Arc<dyn BaseAdapterService>,
    pub messages: Arc<MessageCatalog>,
    /// Public prefix for links to created wiki pages
    pub wiki_url: String,
    pub page_filter: PageFilter,
    pub eln_hosts: ElnHosts,
    pub manual_url: Option<String>,
}

impl ServerDeps {
    pub fn new(
        adapter: Arc<dyn BaseAdapterService>,
        messages: Arc<MessageCatalog>,
        wiki_url: String,
        page_filter: PageFilter,
        eln_hosts: ElnHosts,
        manual_url: Option<String>,
    ) -> Self {
        Self {
            adapter,
            messages,
            wiki_url,
            page_filter,
            eln_hosts,
            manual_url,
        }
    }

    pub fn from_config(
        config: &Config,
        adapter: Arc<dyn BaseAdapterService>,
        messages: Arc<MessageCatalog>,
    ) -> Self {
        Self::new(
            adapter,
            messages,
            config.wiki_url.clone(),
            config.page_filter.clone(),
            config.eln_hosts.clone(),
            config.manual_url.clone(),
        )
    }
}
