// Business domains
pub mod import;
