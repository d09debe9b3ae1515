//! Shared harness for the integration suites.
//!
//! Every suite drives the application returned by [`itam::server::build_app`]
//! over the in-memory store, seeded with one account per role.

use std::sync::{Arc, Mutex};

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::{test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use itam::domain::ports::{
    MailError, MailTransport, OutgoingMail, PasswordHashError, PasswordHasher,
};
use itam::domain::{MailCapability, NotificationSettings, PasswordHash, Role};
use itam::inbound::http::health::HealthState;
use itam::outbound::Repositories;
use itam::outbound::memory::MemoryStore;
use itam::server::{
    AppDependencies, SESSION_COOKIE, build_http_state, build_identity, build_notifier,
};

/// Seeded accounts as `(username, password, role)`; ids follow this order.
pub const ACCOUNTS: [(&str, &str, Role); 4] = [
    ("admin", "admin-pass", Role::Admin),
    ("it", "it-pass", Role::It),
    ("manager", "manager-pass", Role::Manager),
    ("employee", "employee-pass", Role::Employee),
];

/// Stores passwords as `plain$<password>` so suites skip Argon2's cost.
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

/// Keeps every message instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingMailTransport {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailTransport {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.sent
            .lock()
            .map_err(|err| MailError::send(err.to_string()))?
            .push(mail.clone());
        Ok(())
    }
}

/// Application wiring plus handles the suites inspect.
pub struct World {
    pub store: MemoryStore,
    pub mail: Arc<RecordingMailTransport>,
    deps: AppDependencies,
}

impl World {
    /// Mail is recorded.
    pub async fn new() -> Self {
        let mail = Arc::new(RecordingMailTransport::default());
        let transport: Arc<dyn MailTransport> = mail.clone();
        Self::build(mail, MailCapability::Available(transport)).await
    }

    /// No mail server configured.
    pub async fn without_mail() -> Self {
        Self::build(
            Arc::new(RecordingMailTransport::default()),
            MailCapability::unavailable("mail_server is not configured"),
        )
        .await
    }

    async fn build(mail: Arc<RecordingMailTransport>, capability: MailCapability) -> Self {
        let store = MemoryStore::new();
        let repos = Repositories::in_memory(&store);
        let identity = build_identity(&repos, Arc::new(PlainTextHasher), None);
        for (username, password, role) in ACCOUNTS {
            identity
                .upsert_account(username, &format!("{username}@example.com"), password, role)
                .await
                .expect("seed account");
        }
        let notifier = build_notifier(&repos, capability, NotificationSettings::default());
        let deps = AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(build_http_state(&repos, identity, notifier)),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        };
        Self { store, mail, deps }
    }

    pub fn deps(&self) -> AppDependencies {
        self.deps.clone()
    }
}

/// `POST /login` for the given credentials.
pub fn login_request(username: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": username, "password": password }))
}

pub fn get(uri: &str, cookie: &Cookie<'static>) -> test::TestRequest {
    test::TestRequest::get().uri(uri).cookie(cookie.clone())
}

pub fn post(uri: &str, cookie: &Cookie<'static>, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
}

/// Session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

pub fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
