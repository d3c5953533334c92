use time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::server::auth::SessionStore;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "eln_session";

/// Sessions expire after this long without a request
const SESSION_IDLE_HOURS: i64 = 24;

/// Session layer for the import page
///
/// Sessions are saved, and the cookie set, only once something is stored in
/// them, which happens when a form token is issued.
pub fn session_layer(store: SessionStore, secure: bool) -> SessionManagerLayer<SessionStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(secure)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_IDLE_HOURS)))
}
