//! Builders turning a [`Repositories`] bundle into the services handlers use.

use std::sync::Arc;

use crate::domain::ports::PasswordHasher;
use crate::domain::{
    ExpiryNotifier, IdentityService, InventoryService, MailCapability, NotificationSettings,
    ReportService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::Repositories;
use crate::outbound::export::{CsvTableEncoder, spreadsheet_capability};
use crate::outbound::mail::TextNotificationRenderer;

/// Identity service over the user repository.
pub fn build_identity(
    repos: &Repositories,
    hasher: Arc<dyn PasswordHasher>,
    admin_registration_code: Option<String>,
) -> IdentityService {
    IdentityService::new(Arc::clone(&repos.users), hasher)
        .with_admin_registration_code(admin_registration_code)
}

/// Notification engine using the plain-text renderer.
pub fn build_notifier(
    repos: &Repositories,
    mail: MailCapability,
    settings: NotificationSettings,
) -> ExpiryNotifier {
    ExpiryNotifier::new(
        repos.notifier_ports(Arc::new(TextNotificationRenderer)),
        mail,
        settings,
    )
}

/// Assemble the handler state; the notifier is shared with the scheduler.
pub fn build_http_state(
    repos: &Repositories,
    identity: IdentityService,
    notifier: ExpiryNotifier,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        identity,
        inventory: InventoryService::new(repos.inventory_ports()),
        reports: ReportService::new(repos.inventory_ports()),
        notifier,
        csv: Arc::new(CsvTableEncoder),
        spreadsheet: spreadsheet_capability(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Registration};
    use crate::outbound::crypto::Argon2PasswordHasher;
    use crate::outbound::memory::MemoryStore;

    #[tokio::test]
    async fn state_shares_one_store() {
        let repos = Repositories::in_memory(&MemoryStore::new());
        let identity = build_identity(&repos, Arc::new(Argon2PasswordHasher::new()), None);
        let notifier = build_notifier(
            &repos,
            MailCapability::unavailable("mail_server is not configured"),
            NotificationSettings::default(),
        );
        let state = build_http_state(&repos, identity, notifier);

        state
            .identity
            .register(
                &Registration::try_from_parts("ama", "ama@example.com", "hunter22", None)
                    .expect("valid registration"),
            )
            .await
            .expect("registered");
        assert_eq!(state.identity.list_users().await.expect("users").len(), 1);
        assert!(!state.notifier.mail_available());
    }

    #[tokio::test]
    async fn admin_registration_needs_the_configured_code() {
        let repos = Repositories::in_memory(&MemoryStore::new());
        let identity = build_identity(
            &repos,
            Arc::new(Argon2PasswordHasher::new()),
            Some("letmein".into()),
        );
        let wrong = Registration::try_from_parts("root", "root@example.com", "hunter22", Some("nope"))
            .expect("valid registration");
        let err = identity.register(&wrong).await.expect_err("wrong code");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
