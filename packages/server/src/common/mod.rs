// Common types and utilities shared across the application

pub mod html;
pub mod i18n;

pub use i18n::MessageCatalog;
