// ELN Adapter UI
//
// Web front end for the ELN-to-SMW adapter service: users pick an import
// method, submit an experiment URL or an exported file, and get links to the
// wiki pages the service created.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
