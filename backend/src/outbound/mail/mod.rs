//! Outbound mail: SMTP delivery, a logging transport and the notice
//! renderer.

mod logging;
mod renderer;
#[cfg(feature = "smtp")]
mod smtp;

pub use logging::LoggingMailTransport;
pub use renderer::TextNotificationRenderer;
#[cfg(feature = "smtp")]
pub use smtp::SmtpMailTransport;

use crate::domain::MailCapability;

/// Relay settings; `server` being set is what enables mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    /// Use STARTTLS; plaintext otherwise.
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender used when a message names none.
    pub default_sender: Option<String>,
}

/// Decide whether notifications can be mailed.
///
/// Never fails: a missing relay or a build without the `smtp` feature is
/// reported as [`MailCapability::Unavailable`] and startup carries on.
pub fn mail_capability(settings: Option<SmtpSettings>) -> MailCapability {
    let Some(settings) = settings else {
        return MailCapability::unavailable("mail_server is not configured");
    };
    connect(settings)
}

#[cfg(feature = "smtp")]
fn connect(settings: SmtpSettings) -> MailCapability {
    use std::sync::Arc;

    match SmtpMailTransport::from_settings(&settings) {
        Ok(transport) => {
            tracing::info!(server = %settings.server, port = settings.port, "smtp relay configured");
            MailCapability::Available(Arc::new(transport))
        }
        Err(error) => MailCapability::unavailable(error.to_string()),
    }
}

#[cfg(not(feature = "smtp"))]
fn connect(_settings: SmtpSettings) -> MailCapability {
    MailCapability::unavailable("built without the smtp feature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_server_is_unavailable() {
        let capability = mail_capability(None);
        assert!(!capability.is_available());
        match capability {
            MailCapability::Unavailable { reason } => {
                assert_eq!(reason, "mail_server is not configured");
            }
            MailCapability::Available(_) => panic!("expected unavailable"),
        }
    }

    #[cfg(feature = "smtp")]
    #[tokio::test]
    async fn configured_relay_is_available() {
        let capability = mail_capability(Some(SmtpSettings {
            server: "smtp.example.com".into(),
            port: 2525,
            use_tls: false,
            username: None,
            password: None,
            default_sender: Some("IT Desk <it@example.com>".into()),
        }));
        assert!(capability.is_available());
    }
}
