// Browser sessions and anti-forgery tokens
pub mod form_token;
pub mod session;

pub use form_token::*;
pub use session::*;
