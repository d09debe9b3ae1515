//! Listener and session-cookie settings for [`super::create_server`].

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use crate::config::AppSettings;

/// Where to listen and how to protect the session cookie.
///
/// Built from [`AppSettings`] once the session key has been resolved; the
/// key itself never comes back out.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// `Secure`, `SameSite=Lax` cookies on `bind_addr`.
    #[must_use]
    pub fn new(key: Key, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure: true,
            same_site: SameSite::Lax,
            bind_addr,
        }
    }

    /// Apply the cookie flags from `settings`.
    #[must_use]
    pub fn with_settings(mut self, settings: &AppSettings) -> Self {
        self.cookie_secure = settings.cookie_secure();
        self
    }

    /// Plain-HTTP development setups need `false`.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}
