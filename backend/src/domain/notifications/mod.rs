//! Expiry notifications for software licences and asset warranties.
//!
//! Both record kinds share one engine ([`ExpiryNotifier`]): select the
//! records expiring inside the look-ahead window, group them by assignee and
//! send one message per assignee. When no record is assigned the batch goes
//! to explicitly named recipients and, optionally, to every Admin/IT user.

mod engine;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{MailTransport, StoreError};
use crate::domain::{Asset, EmployeeId, Error, SoftwareLicense};

pub use engine::{ExpiryNotifier, NotifierPorts};

/// Default look-ahead window in days for both record kinds.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Which expiry the engine looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// `SoftwareLicense::expiry_date`.
    License,
    /// `Asset::warranty_expiry`.
    #[default]
    Warranty,
}

impl RecordKind {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::License => "license",
            Self::Warranty => "warranty",
        }
    }

    /// Subject of the personal message sent to one assignee.
    pub fn assignee_subject(self, count: usize) -> String {
        match self {
            Self::License => {
                format!("License Expiry Notice - {count} license(s) assigned to you expiring soon")
            }
            Self::Warranty => {
                format!("Warranty Expiry Notice - {count} asset(s) assigned to you expiring soon")
            }
        }
    }

    /// Subject of the batch message sent when nothing is assigned.
    pub fn broadcast_subject(self, count: usize) -> String {
        match self {
            Self::License => format!("License Expiry Notifications - {count} licenses expiring soon"),
            Self::Warranty => {
                format!("Warranty Expiry Notifications - {count} warranties expiring soon")
            }
        }
    }

    /// Flash message shown after a manual trigger.
    pub const fn sent_message(self) -> &'static str {
        match self {
            Self::License => "License expiry notifications sent successfully!",
            Self::Warranty => "Warranty expiry notifications sent successfully!",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a record kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification type: {raw}")]
pub struct RecordKindParseError {
    raw: String,
}

impl FromStr for RecordKind {
    type Err = RecordKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "license" => Ok(Self::License),
            "warranty" => Ok(Self::Warranty),
            other => Err(RecordKindParseError {
                raw: other.to_owned(),
            }),
        }
    }
}

/// A licence or asset reduced to what a notice lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringItem {
    /// Primary key of the source row.
    pub record_id: i32,
    /// Software name or asset tag.
    pub label: String,
    /// Secondary description, e.g. brand and model.
    pub detail: Option<String>,
    /// Licence expiry or warranty end.
    pub expires_on: NaiveDate,
    /// Assigned employee.
    pub assigned_to: Option<EmployeeId>,
}

impl ExpiringItem {
    /// Returns `None` for licences without an expiry date.
    pub fn from_license(license: &SoftwareLicense) -> Option<Self> {
        Some(Self {
            record_id: license.id.get(),
            label: license.software_name.clone(),
            detail: None,
            expires_on: license.expiry_date?,
            assigned_to: license.assigned_to,
        })
    }

    /// Returns `None` for assets without a warranty date.
    pub fn from_asset(asset: &Asset) -> Option<Self> {
        let details = &asset.details;
        let detail = [details.brand.as_deref(), details.model.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        Some(Self {
            record_id: asset.id.get(),
            label: asset.asset_tag.clone(),
            detail: (!detail.is_empty()).then_some(detail),
            expires_on: details.warranty_expiry?,
            assigned_to: details.assigned_to,
        })
    }
}

/// Caller-controlled knobs for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    /// Look-ahead in days; `None` or zero uses the configured default.
    pub window_days: Option<u32>,
    /// Copy every Admin/IT user on each message.
    pub cc_admin_it: bool,
    /// Extra carbon-copy addresses.
    pub extra_cc: Vec<String>,
    /// Direct recipients used only when no record is assigned.
    pub extra_to: Vec<String>,
    /// Suppress the Admin/IT broadcast when no record is assigned.
    pub assignees_only: bool,
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            window_days: None,
            cc_admin_it: false,
            extra_cc: Vec::new(),
            extra_to: Vec::new(),
            assignees_only: true,
        }
    }
}

/// Outcome of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    pub kind: RecordKind,
    pub window_days: u32,
    pub assignee_emails_sent: u32,
    pub assignee_recipients: Vec<String>,
    pub fallback_admin_it_emails_sent: u32,
    pub admin_it_recipients: Vec<String>,
    pub extra_to_emails_sent: u32,
    pub extra_to_recipients: Vec<String>,
    pub skipped_no_email: u32,
}

impl NotificationSummary {
    /// Summary with every counter at zero.
    pub fn empty(kind: RecordKind, window_days: u32) -> Self {
        Self {
            kind,
            window_days,
            assignee_emails_sent: 0,
            assignee_recipients: Vec::new(),
            fallback_admin_it_emails_sent: 0,
            admin_it_recipients: Vec::new(),
            extra_to_emails_sent: 0,
            extra_to_recipients: Vec::new(),
            skipped_no_email: 0,
        }
    }

    /// Messages accepted by the transport in this batch.
    pub fn total_sent(&self) -> u32 {
        self.assignee_emails_sent + self.fallback_admin_it_emails_sent + self.extra_to_emails_sent
    }
}

/// Failures that stop a batch before any message is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// No transport is configured.
    #[error("email notifications are unavailable: {reason}")]
    MailUnavailable { reason: String },
    /// Loading records or recipients failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<NotificationError> for Error {
    fn from(value: NotificationError) -> Self {
        match value {
            NotificationError::MailUnavailable { reason } => {
                Self::service_unavailable("Email notifications are not available")
                    .with_details(serde_json::json!({ "reason": reason }))
            }
            NotificationError::Store(err) => err.into(),
        }
    }
}

/// Whether outbound mail can be sent.
#[derive(Clone)]
pub enum MailCapability {
    Available(Arc<dyn MailTransport>),
    Unavailable { reason: String },
}

impl MailCapability {
    /// Capability with no transport.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Debug for MailCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => f.write_str("MailCapability::Available"),
            Self::Unavailable { reason } => f
                .debug_struct("MailCapability::Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Configured defaults for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub license_window_days: u32,
    pub warranty_window_days: u32,
    /// Sender used when no Admin/IT user has an address.
    pub default_sender: Option<String>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            license_window_days: DEFAULT_WINDOW_DAYS,
            warranty_window_days: DEFAULT_WINDOW_DAYS,
            default_sender: None,
        }
    }
}

impl NotificationSettings {
    /// Configured window for `kind`.
    pub const fn window_for(&self, kind: RecordKind) -> u32 {
        match kind {
            RecordKind::License => self.license_window_days,
            RecordKind::Warranty => self.warranty_window_days,
        }
    }

    /// Window for a batch: a positive override wins, otherwise the default.
    pub fn effective_window(&self, kind: RecordKind, requested: Option<u32>) -> u32 {
        requested
            .filter(|days| *days > 0)
            .unwrap_or_else(|| self.window_for(kind))
    }
}

/// Loose address check: anything containing `@` is treated as an address.
pub fn contains_at_sign(value: &str) -> bool {
    value.contains('@')
}
