// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseAdapterService)

use adapter_client::{AdaptOutcome, ServiceStatus};
use async_trait::async_trait;

// =============================================================================
// Adapter Service Trait (Infrastructure - ELN import)
// =============================================================================

#[async_trait]
pub trait BaseAdapterService: Send + Sync {
    /// Poll the service status. `None` means the service is unavailable.
    async fn check_status(&self) -> Option<ServiceStatus>;

    /// Import one experiment (or stored upload) through the given plugin
    async fn adapt(&self, eln: &str, id: &str) -> AdaptOutcome;
}
