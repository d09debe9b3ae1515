//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::json;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{MailCapability, NotificationSettings, PasswordHash, Role};
use crate::outbound::Repositories;
use crate::outbound::mail::LoggingMailTransport;
use crate::outbound::memory::MemoryStore;
use crate::server::{build_http_state, build_identity, build_notifier};

use super::configure;
use super::state::HttpState;

/// Seeded accounts as `(username, password, role)`.
pub const ACCOUNTS: [(&str, &str, Role); 4] = [
    ("admin", "admin-pass", Role::Admin),
    ("it", "it-pass", Role::It),
    ("manager", "manager-pass", Role::Manager),
    ("employee", "employee-pass", Role::Employee),
];

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Stores passwords as `plain$<password>` so tests skip Argon2's cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

impl PasswordHasher for PlainTextHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("plain${password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str().strip_prefix("plain$") == Some(password))
    }
}

/// In-memory application with one account per role.
pub struct TestApp {
    pub store: MemoryStore,
    pub state: web::Data<HttpState>,
}

impl TestApp {
    /// Mail is logged rather than sent.
    pub async fn new() -> Self {
        Self::with_mail(MailCapability::Available(Arc::new(LoggingMailTransport))).await
    }

    pub async fn with_mail(mail: MailCapability) -> Self {
        let store = MemoryStore::new();
        let repos = Repositories::in_memory(&store);
        let identity = build_identity(&repos, Arc::new(PlainTextHasher), Some("letmein".into()));
        for (username, password, role) in ACCOUNTS {
            identity
                .upsert_account(username, &format!("{username}@example.com"), password, role)
                .await
                .expect("seed account");
        }
        let notifier = build_notifier(&repos, mail, NotificationSettings::default());
        let state = web::Data::new(build_http_state(&repos, identity, notifier));
        Self { store, state }
    }

    /// App with state, a test session and every route.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(test_session_middleware())
            .configure(configure)
    }
}

/// `POST /login` request for the given credentials.
pub fn login_request(username: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": username, "password": password }))
}

/// Session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
