//! Backend entry-point: loads settings, selects the store, starts the daily
//! scheduler and serves the JSON surface.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use itam::config::AppSettings;
use itam::domain::MailCapability;
use itam::inbound::http::health::HealthState;
use itam::inbound::scheduler::{SchedulerCapability, SchedulerConfig, start_scheduler};
use itam::outbound::Repositories;
use itam::outbound::crypto::Argon2PasswordHasher;
use itam::outbound::mail::mail_capability;
use itam::server::{
    ServerConfig, build_http_state, build_identity, build_notifier, create_server,
};

/// Smallest secret `Key::derive_from` accepts.
const MIN_SECRET_KEY_LEN: usize = 32;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let key = session_key(&settings)?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|err| {
        io::Error::other(format!("invalid bind_addr {:?}: {err}", settings.bind_addr()))
    })?;

    let repos = Repositories::connect(settings.database_url.as_deref())
        .await
        .map_err(io::Error::other)?;

    let mail = mail_capability(settings.smtp_settings());
    if let MailCapability::Unavailable { reason } = &mail {
        warn!(%reason, "email notifications disabled");
    }
    let notifier = build_notifier(&repos, mail, settings.notification_settings());
    let scheduler = match SchedulerConfig::parse(
        settings.scheduler_enabled(),
        settings.license_check_at(),
        settings.warranty_check_at(),
    ) {
        Ok(config) => start_scheduler(notifier.clone(), config),
        Err(err) => {
            warn!(error = %err, "scheduler not started");
            SchedulerCapability::unavailable(err.to_string())
        }
    };

    let identity = build_identity(
        &repos,
        Arc::new(Argon2PasswordHasher::new()),
        settings.admin_registration_code(),
    );
    let http_state = build_http_state(&repos, identity, notifier);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        http_state,
        ServerConfig::new(key, bind_addr).with_settings(&settings),
    )?;
    info!(%bind_addr, "listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    scheduler.shutdown();
    outcome
}

fn session_key(settings: &AppSettings) -> io::Result<Key> {
    match settings.secret_key.as_deref() {
        Some(secret) if secret.len() >= MIN_SECRET_KEY_LEN => Ok(Key::derive_from(secret.as_bytes())),
        Some(_) => Err(io::Error::other(format!(
            "secret_key must be at least {MIN_SECRET_KEY_LEN} bytes"
        ))),
        None if cfg!(debug_assertions) || settings.session_allow_ephemeral => {
            warn!("secret_key not set; using a temporary session key, sessions end on restart");
            Ok(Key::generate())
        }
        None => Err(io::Error::other(
            "secret_key is required; set ITAM_SECRET_KEY or ITAM_SESSION_ALLOW_EPHEMERAL=true",
        )),
    }
}
