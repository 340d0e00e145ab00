//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions, with cookies
//! signed by a key derived from the configured session secret.

use secrecy::ExposeSecret;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "stocklist_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over a `SQLite` store.
///
/// The store's own table must already exist; callers run
/// `SqliteStore::migrate` before building the layer.
///
/// # Panics
///
/// Panics if the session secret is shorter than 32 bytes. Config validation
/// rejects such secrets before this is reached.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &AppConfig,
) -> SessionManagerLayer<SqliteStore, SignedCookie> {
    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_derivation_accepts_minimum_length_secret() {
        // Config validation allows secrets as short as 32 bytes; key
        // derivation must accept them.
        let secret = "a".repeat(32);
        let _key = Key::derive_from(secret.as_bytes());
    }
}
