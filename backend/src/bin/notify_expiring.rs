//! Run one expiry notification batch from the command line.
//!
//! Mail and store settings come from the `ITAM_*` environment. With
//! `--dry-run` messages are logged instead of sent.
//!
//! # Examples
//! ```sh
//! cargo run --bin notify-expiring -- --type license --days 14 --cc-admin-it
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use itam::config::AppSettings;
use itam::domain::{MailCapability, NotificationOptions, RecordKind, TraceId};
use itam::outbound::Repositories;
use itam::outbound::mail::{LoggingMailTransport, mail_capability};
use itam::server::build_notifier;

/// `notify-expiring` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "notify-expiring",
    about = "Send license or warranty expiry notices once",
    version
)]
struct CliArgs {
    /// `license` or `warranty`.
    #[arg(long = "type", value_name = "kind", value_parser = parse_kind)]
    kind: RecordKind,
    /// Look-ahead window in days; the configured default when omitted.
    #[arg(long)]
    days: Option<u32>,
    /// Copy every Admin and IT address.
    #[arg(long)]
    cc_admin_it: bool,
    /// Extra CC address; repeatable.
    #[arg(long = "cc", value_name = "address")]
    extra_cc: Vec<String>,
    /// Direct recipient used when no record is assigned; repeatable.
    #[arg(long = "to", value_name = "address")]
    extra_to: Vec<String>,
    /// Mail every Admin and IT user when no record is assigned.
    #[arg(long)]
    broadcast_unassigned: bool,
    /// Log messages instead of sending them.
    #[arg(long)]
    dry_run: bool,
}

fn parse_kind(raw: &str) -> Result<RecordKind, String> {
    raw.parse().map_err(|err: itam::domain::notifications::RecordKindParseError| err.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(TraceId::scope(TraceId::generate(), run(args)))
}

async fn run(args: CliArgs) -> Result<()> {
    let settings = AppSettings::load_from_iter([OsString::from("notify-expiring")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let repos = Repositories::connect(settings.database_url.as_deref())
        .await
        .wrap_err("failed to open the store")?;
    let mail = if args.dry_run {
        MailCapability::Available(Arc::new(LoggingMailTransport))
    } else {
        mail_capability(settings.smtp_settings())
    };
    let notifier = build_notifier(&repos, mail, settings.notification_settings());

    let options = NotificationOptions {
        window_days: args.days,
        cc_admin_it: args.cc_admin_it,
        extra_cc: args.extra_cc,
        extra_to: args.extra_to,
        assignees_only: !args.broadcast_unassigned,
    };
    let summary = notifier
        .notify(args.kind, &options)
        .await
        .map_err(|err| eyre!("notification run failed: {err}"))?;
    let report =
        serde_json::to_string_pretty(&summary).wrap_err("failed to serialise the summary")?;
    println!("{report}");
    Ok(())
}
