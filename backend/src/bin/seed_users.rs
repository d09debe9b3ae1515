//! Create or refresh the default Admin and IT accounts.
//!
//! Settings come from the `ITAM_*` environment, as for the server.
//!
//! # Examples
//! ```sh
//! ITAM_DATABASE_URL=postgres://localhost/itam cargo run --bin seed-users
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use itam::config::AppSettings;
use itam::domain::Role;
use itam::outbound::Repositories;
use itam::outbound::crypto::Argon2PasswordHasher;
use itam::server::build_identity;

const DEFAULT_PASSWORD: &str = "ChangeMe123!";

const SEED_ACCOUNTS: [(&str, &str, Role); 2] = [
    ("admin", "admin@example.com", Role::Admin),
    ("it", "it@example.com", Role::It),
];

/// `seed-users` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "seed-users", about = "Upsert the default Admin and IT accounts", version)]
struct CliArgs {
    /// Database connection URL. Falls back to `ITAM_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Password given to both accounts.
    #[arg(long, default_value = DEFAULT_PASSWORD)]
    password: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(seed(args))
}

async fn seed(args: CliArgs) -> Result<()> {
    let settings = AppSettings::load_from_iter([OsString::from("seed-users")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = args.database_url.or(settings.database_url);
    let repos = Repositories::connect(database_url.as_deref())
        .await
        .wrap_err("failed to open the store")?;
    let identity = build_identity(&repos, Arc::new(Argon2PasswordHasher::new()), None);

    for (username, email, role) in SEED_ACCOUNTS {
        let user = identity
            .upsert_account(username, email, &args.password, role)
            .await
            .map_err(|err| eyre!("failed to seed {username}: {}", err.message()))?;
        info!(user_id = %user.id(), %username, %role, "account seeded");
        println!("{username} ({role}) ready");
    }
    Ok(())
}
