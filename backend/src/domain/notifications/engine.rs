//! Batch orchestration for expiry notices.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use super::{
    ExpiringItem, MailCapability, NotificationError, NotificationOptions, NotificationSettings,
    NotificationSummary, RecordKind, contains_at_sign,
};
use crate::domain::ports::{
    AssetQuery, AssetRepository, EmployeeRepository, LicenseQuery, LicenseRepository,
    MailTransport, NotificationRenderer, OutgoingMail, RenderContext, UserRepository,
};
use crate::domain::{DateRange, EmployeeId, Role, User};

/// Store and rendering ports the engine reads from.
#[derive(Clone)]
pub struct NotifierPorts {
    pub users: Arc<dyn UserRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub assets: Arc<dyn AssetRepository>,
    pub licenses: Arc<dyn LicenseRepository>,
    pub renderer: Arc<dyn NotificationRenderer>,
}

/// Sends licence and warranty expiry notices.
///
/// The engine never writes to the store, so concurrent runs are safe but may
/// deliver the same notice twice.
#[derive(Clone)]
pub struct ExpiryNotifier {
    ports: NotifierPorts,
    mail: MailCapability,
    clock: Arc<dyn Clock>,
    settings: NotificationSettings,
}

/// Values shared by every message of one batch.
struct Batch<'a> {
    kind: RecordKind,
    window_days: u32,
    now: DateTime<Utc>,
    sender: Option<String>,
    transport: &'a dyn MailTransport,
}

/// One message before rendering.
struct Notice<'a> {
    to: &'a str,
    cc: &'a [String],
    display_name: &'a str,
    subject: String,
    records: Vec<ExpiringItem>,
}

impl ExpiryNotifier {
    /// Build an engine that reads the wall clock.
    pub fn new(ports: NotifierPorts, mail: MailCapability, settings: NotificationSettings) -> Self {
        Self {
            ports,
            mail,
            clock: Arc::new(DefaultClock),
            settings,
        }
    }

    /// Replace the clock used to compute "today".
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn mail_available(&self) -> bool {
        self.mail.is_available()
    }

    /// Run one batch for `kind`.
    ///
    /// Individual render or delivery failures are logged and left out of the
    /// summary; only an unavailable transport or a store failure aborts.
    pub async fn notify(
        &self,
        kind: RecordKind,
        options: &NotificationOptions,
    ) -> Result<NotificationSummary, NotificationError> {
        let transport = match &self.mail {
            MailCapability::Available(transport) => Arc::clone(transport),
            MailCapability::Unavailable { reason } => {
                warn!(kind = %kind, reason = %reason, "skipping expiry notifications");
                return Err(NotificationError::MailUnavailable {
                    reason: reason.clone(),
                });
            }
        };

        let window_days = self.settings.effective_window(kind, options.window_days);
        let now = self.clock.utc();
        let range = DateRange::days_from(now.date_naive(), window_days);
        let mut summary = NotificationSummary::empty(kind, window_days);

        let records = self.expiring_records(kind, range).await?;
        if records.is_empty() {
            info!(kind = %kind, window_days, "no records expiring");
            return Ok(summary);
        }

        let staff = self.ports.users.list_by_roles(&Role::STAFF).await?;
        let staff_emails = staff_addresses(&staff);
        let sender = staff_emails
            .first()
            .cloned()
            .or_else(|| self.settings.default_sender.clone());
        let staff_cc: &[String] = if options.cc_admin_it {
            &staff_emails
        } else {
            &[]
        };
        let cc = merge_cc(staff_cc, &options.extra_cc);

        let batch = Batch {
            kind,
            window_days,
            now,
            sender,
            transport: transport.as_ref(),
        };

        let by_assignee = group_by_assignee(&records);
        if by_assignee.is_empty() {
            self.broadcast(&batch, &records, &staff, &cc, options, &mut summary)
                .await;
        } else {
            self.notify_assignees(&batch, by_assignee, &cc, &mut summary)
                .await?;
        }

        info!(
            kind = %kind,
            window_days,
            matched = records.len(),
            sent = summary.total_sent(),
            skipped_no_email = summary.skipped_no_email,
            "expiry notification batch finished"
        );
        Ok(summary)
    }

    async fn expiring_records(
        &self,
        kind: RecordKind,
        range: DateRange,
    ) -> Result<Vec<ExpiringItem>, NotificationError> {
        let records = match kind {
            RecordKind::License => self
                .ports
                .licenses
                .list(&LicenseQuery::expiring(range))
                .await?
                .iter()
                .filter_map(ExpiringItem::from_license)
                .collect(),
            RecordKind::Warranty => self
                .ports
                .assets
                .list(&AssetQuery::warranty_expiring(range))
                .await?
                .iter()
                .filter_map(ExpiringItem::from_asset)
                .collect(),
        };
        Ok(records)
    }

    async fn broadcast(
        &self,
        batch: &Batch<'_>,
        records: &[ExpiringItem],
        staff: &[User],
        cc: &[String],
        options: &NotificationOptions,
        summary: &mut NotificationSummary,
    ) {
        let subject = batch.kind.broadcast_subject(records.len());

        for address in options
            .extra_to
            .iter()
            .filter(|raw| contains_at_sign(raw))
            .map(|raw| raw.trim())
        {
            let notice = Notice {
                to: address,
                cc,
                display_name: address,
                subject: subject.clone(),
                records: records.to_vec(),
            };
            if self.deliver(batch, notice).await {
                summary.extra_to_emails_sent += 1;
                summary.extra_to_recipients.push(address.to_owned());
            }
        }

        if options.assignees_only {
            return;
        }

        for user in staff {
            let address = user.email().trim();
            if address.is_empty() {
                continue;
            }
            let notice = Notice {
                to: address,
                cc: &[],
                display_name: user.username(),
                subject: subject.clone(),
                records: records.to_vec(),
            };
            if self.deliver(batch, notice).await {
                summary.fallback_admin_it_emails_sent += 1;
                summary.admin_it_recipients.push(address.to_owned());
            }
        }
    }

    async fn notify_assignees(
        &self,
        batch: &Batch<'_>,
        by_assignee: BTreeMap<EmployeeId, Vec<ExpiringItem>>,
        cc: &[String],
        summary: &mut NotificationSummary,
    ) -> Result<(), NotificationError> {
        let ids: Vec<EmployeeId> = by_assignee.keys().copied().collect();
        let employees: HashMap<EmployeeId, _> = self
            .ports
            .employees
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|employee| (employee.id, employee))
            .collect();

        for (employee_id, records) in by_assignee {
            let Some(employee) = employees.get(&employee_id) else {
                continue;
            };
            let Some(address) = employee
                .contact
                .as_deref()
                .filter(|contact| contains_at_sign(contact))
                .map(str::trim)
            else {
                summary.skipped_no_email += 1;
                continue;
            };

            let notice = Notice {
                to: address,
                cc,
                display_name: &employee.name,
                subject: batch.kind.assignee_subject(records.len()),
                records,
            };
            if self.deliver(batch, notice).await {
                summary.assignee_emails_sent += 1;
                summary.assignee_recipients.push(address.to_owned());
            }
        }
        Ok(())
    }

    /// Render and send one message; `false` when either step failed.
    async fn deliver(&self, batch: &Batch<'_>, notice: Notice<'_>) -> bool {
        let context = RenderContext {
            kind: batch.kind,
            records: notice.records,
            recipient_display_name: notice.display_name.to_owned(),
            window_days: batch.window_days,
            current_time: batch.now,
        };
        let body = match self.ports.renderer.render(&context) {
            Ok(body) => body,
            Err(error) => {
                warn!(recipient = notice.to, error = %error, "failed to render expiry notice");
                return false;
            }
        };

        let mail = OutgoingMail {
            from: batch.sender.clone(),
            to: vec![notice.to.to_owned()],
            cc: notice.cc.to_vec(),
            subject: notice.subject,
            body,
        };
        match batch.transport.send(&mail).await {
            Ok(()) => true,
            Err(error) => {
                warn!(recipient = notice.to, error = %error, "failed to send expiry notice");
                false
            }
        }
    }
}

fn staff_addresses(staff: &[User]) -> Vec<String> {
    staff
        .iter()
        .map(|user| user.email().trim())
        .filter(|email| !email.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Staff addresses then extras, blanks dropped, first occurrence kept.
pub(super) fn merge_cc(staff: &[String], extra: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    staff
        .iter()
        .chain(extra)
        .map(|address| address.trim())
        .filter(|address| contains_at_sign(address))
        .filter(|address| seen.insert(address.to_string()))
        .map(ToOwned::to_owned)
        .collect()
}

/// Assigned records keyed by employee in ascending id order.
pub(super) fn group_by_assignee(
    records: &[ExpiringItem],
) -> BTreeMap<EmployeeId, Vec<ExpiringItem>> {
    let mut grouped: BTreeMap<EmployeeId, Vec<ExpiringItem>> = BTreeMap::new();
    for record in records {
        if let Some(employee_id) = record.assigned_to {
            grouped.entry(employee_id).or_default().push(record.clone());
        }
    }
    grouped
}
