//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{AdapterServiceClient, ServerDeps};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{MockAdapterService, TestDependencies};
pub use traits::*;
