//! Session middleware assembly.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::SessionConfig;

/// Builds the session middleware from configuration.
///
/// Cookies are signed and expire on inactivity, so an idle session older
/// than the configured max age is treated as absent on the next request.
pub fn build_session_layer<S: SessionStore>(
    store: S,
    config: &SessionConfig,
) -> SessionManagerLayer<S, SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.cookie_secure)
        .with_http_only(config.cookie_http_only)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(config.max_age()))
        .with_signed(signing_key(config.secret.expose_secret()))
}

/// Derives the cookie signing key from the shared secret.
///
/// SHA-512 yields exactly the 64 bytes `Key::from` requires, so secrets of
/// any length work.
fn signing_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}
