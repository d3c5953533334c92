// TestDependencies - mock implementations for testing
//
// Provides a mock adapter service that can be injected into ServerDeps for tests.

use adapter_client::{AdaptOutcome, AdapterRequest, AdapterResponse, ServiceStatus};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{BaseAdapterService, ServerDeps};
use crate::common::MessageCatalog;
use crate::domains::import::{ElnHosts, PageFilter};

// =============================================================================
// Mock Adapter Service
// =============================================================================

pub struct MockAdapterService {
    status: Option<ServiceStatus>,
    outcomes: Arc<Mutex<Vec<AdaptOutcome>>>,
    adapt_calls: Arc<Mutex<Vec<AdapterRequest>>>,
    status_calls: Arc<Mutex<usize>>,
}

impl MockAdapterService {
    /// Service that answers `/status` with `status` (`None` = offline)
    pub fn new(status: Option<ServiceStatus>) -> Self {
        Self {
            status,
            outcomes: Arc::new(Mutex::new(Vec::new())),
            adapt_calls: Arc::new(Mutex::new(Vec::new())),
            status_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Service that is down for both endpoints
    pub fn offline() -> Self {
        Self::new(None).with_outcome(AdaptOutcome::ServiceUnavailable)
    }

    /// Queue an outcome for the next adapt call
    pub fn with_outcome(self, outcome: AdaptOutcome) -> Self {
        self.outcomes.lock().unwrap().push(outcome);
        self
    }

    /// Queue a successful response for the next adapt call
    pub fn with_response(self, response: AdapterResponse) -> Self {
        self.with_outcome(AdaptOutcome::Ok(response))
    }

    /// Get all adapt requests that were made
    pub fn adapt_calls(&self) -> Vec<AdapterRequest> {
        self.adapt_calls.lock().unwrap().clone()
    }

    pub fn adapt_call_count(&self) -> usize {
        self.adapt_calls.lock().unwrap().len()
    }

    pub fn status_call_count(&self) -> usize {
        *self.status_calls.lock().unwrap()
    }
}

#[async_trait]
impl BaseAdapterService for MockAdapterService {
    async fn check_status(&self) -> Option<ServiceStatus> {
        *self.status_calls.lock().unwrap() += 1;
        self.status.clone()
    }

    async fn adapt(&self, eln: &str, id: &str) -> AdaptOutcome {
        // Record the call
        self.adapt_calls
            .lock()
            .unwrap()
            .push(AdapterRequest::new(eln, id));

        let mut outcomes = self.outcomes.lock().unwrap();
        if !outcomes.is_empty() {
            outcomes.remove(0)
        } else {
            AdaptOutcome::Ok(AdapterResponse::default())
        }
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Test dependency bundle with sensible defaults
pub struct TestDependencies {
    pub adapter: Arc<MockAdapterService>,
    pub wiki_url: String,
    pub page_filter: PageFilter,
    pub eln_hosts: ElnHosts,
}

impl TestDependencies {
    pub fn new(adapter: MockAdapterService) -> Self {
        Self {
            adapter: Arc::new(adapter),
            wiki_url: "https://wiki.example.org/wiki".to_string(),
            page_filter: PageFilter::default(),
            eln_hosts: ElnHosts::default(),
        }
    }

    /// Build ServerDeps sharing this bundle's mock
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.adapter.clone(),
            Arc::new(MessageCatalog::builtin()),
            self.wiki_url.clone(),
            self.page_filter.clone(),
            self.eln_hosts.clone(),
            None,
        )
    }
}
