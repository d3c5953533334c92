// HTTP routes
pub mod health;
pub mod import_page;

pub use health::*;
pub use import_page::*;
