//! Transport that records messages in the log instead of sending them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{MailError, MailTransport, OutgoingMail};

/// Logs each message at `info` and reports success. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailTransport;

#[async_trait]
impl MailTransport for LoggingMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        info!(
            from = mail.from.as_deref().unwrap_or("<default>"),
            to = ?mail.to,
            cc = ?mail.cc,
            subject = %mail.subject,
            body = %mail.body.text,
            "mail not sent (dry run)"
        );
        Ok(())
    }
}
