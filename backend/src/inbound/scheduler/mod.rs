//! Daily timer that drives the expiry notification engine.
//!
//! Each job gets its own tokio task that sleeps until the next occurrence of
//! its [`DailySchedule`], runs one batch with default options inside a fresh
//! [`TraceId`] scope, logs the outcome and repeats.

mod schedule;

pub use schedule::{DailySchedule, ScheduleParseError};

use std::time::Duration;

use chrono::Local;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::{ExpiryNotifier, NotificationOptions, RecordKind, TraceId};

/// One recurring notification batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledJob {
    pub name: &'static str,
    pub kind: RecordKind,
    pub schedule: DailySchedule,
}

/// What to schedule; `enabled = false` starts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub license_at: DailySchedule,
    pub warranty_at: DailySchedule,
}

impl SchedulerConfig {
    /// Build from `HH:MM` strings.
    pub fn parse(
        enabled: bool,
        license_at: &str,
        warranty_at: &str,
    ) -> Result<Self, ScheduleParseError> {
        Ok(Self {
            enabled,
            license_at: DailySchedule::parse(license_at)?,
            warranty_at: DailySchedule::parse(warranty_at)?,
        })
    }

    pub fn jobs(&self) -> [ScheduledJob; 2] {
        [
            ScheduledJob {
                name: "license_expiry_notifications",
                kind: RecordKind::License,
                schedule: self.license_at,
            },
            ScheduledJob {
                name: "warranty_expiry_notifications",
                kind: RecordKind::Warranty,
                schedule: self.warranty_at,
            },
        ]
    }
}

/// Running job tasks. Dropping the handle leaves them running.
#[derive(Debug)]
pub struct SchedulerHandle {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl SchedulerHandle {
    /// Names of the scheduled jobs.
    pub fn job_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|(name, _)| *name).collect()
    }

    /// Abort every job task.
    pub fn shutdown(self) {
        for (name, task) in self.tasks {
            task.abort();
            info!(job = name, "scheduled job stopped");
        }
    }
}

/// Whether the daily jobs are running.
#[derive(Debug)]
pub enum SchedulerCapability {
    Available(SchedulerHandle),
    Unavailable { reason: String },
}

impl SchedulerCapability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Stop the jobs if any were started.
    pub fn shutdown(self) {
        if let Self::Available(handle) = self {
            handle.shutdown();
        }
    }
}

/// Start one task per job on the current tokio runtime.
///
/// Never fails: a disabled scheduler or a missing runtime is reported as
/// [`SchedulerCapability::Unavailable`] with a warning.
pub fn start_scheduler(notifier: ExpiryNotifier, config: SchedulerConfig) -> SchedulerCapability {
    if !config.enabled {
        warn!("scheduler disabled by configuration; expiry notifications run only on demand");
        return SchedulerCapability::unavailable("scheduler disabled by configuration");
    }
    let runtime = match Handle::try_current() {
        Ok(runtime) => runtime,
        Err(err) => {
            warn!(error = %err, "no tokio runtime; scheduler not started");
            return SchedulerCapability::unavailable(format!("no tokio runtime: {err}"));
        }
    };

    let tasks = config
        .jobs()
        .into_iter()
        .map(|job| {
            info!(job = job.name, at = %job.schedule, "scheduled job registered");
            (job.name, runtime.spawn(run_forever(notifier.clone(), job)))
        })
        .collect();
    SchedulerCapability::Available(SchedulerHandle { tasks })
}

async fn run_forever(notifier: ExpiryNotifier, job: ScheduledJob) {
    loop {
        let now = Local::now();
        let next = job.schedule.next_run_after(&now);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        info!(job = job.name, next_run = %next, "waiting for next run");
        tokio::time::sleep(wait).await;
        TraceId::scope(TraceId::generate(), run_job(&notifier, &job)).await;
    }
}

/// Run one batch of `job` and log the outcome.
pub(crate) async fn run_job(notifier: &ExpiryNotifier, job: &ScheduledJob) {
    match notifier
        .notify(job.kind, &NotificationOptions::default())
        .await
    {
        Ok(summary) => info!(
            job = job.name,
            window_days = summary.window_days,
            sent = summary.total_sent(),
            skipped_no_email = summary.skipped_no_email,
            "scheduled notifications finished"
        ),
        Err(err) => error!(job = job.name, error = %err, "scheduled notifications failed"),
    }
}
