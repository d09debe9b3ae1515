//! SMTP delivery through lettre's async transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::warn;

use super::SmtpSettings;
use crate::domain::ports::{MailError, MailTransport, OutgoingMail};

/// Sends multipart (text + HTML) messages through one relay.
#[derive(Clone)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    default_sender: Option<Mailbox>,
}

impl SmtpMailTransport {
    /// Build the transport. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Fails when the relay name or default sender cannot be parsed.
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self, MailError> {
        let builder = if settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
                .map_err(|err| MailError::build(err.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.server)
        };
        let builder = builder.port(settings.port);
        let builder = match (&settings.username, &settings.password) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.clone(), password.clone()))
            }
            _ => builder,
        };
        let default_sender = settings
            .default_sender
            .as_deref()
            .map(parse_mailbox)
            .transpose()?;
        Ok(Self {
            transport: builder.build(),
            default_sender,
        })
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let from = match mail.from.as_deref() {
            Some(address) => parse_mailbox(address)?,
            None => self
                .default_sender
                .clone()
                .ok_or_else(|| MailError::build("no sender address configured"))?,
        };
        let mut builder = Message::builder().from(from).subject(mail.subject.as_str());
        for address in &mail.to {
            builder = builder.to(parse_mailbox(address)?);
        }
        // Unparsable copies are dropped; the primary recipient still gets mail.
        for address in &mail.cc {
            match parse_mailbox(address) {
                Ok(mailbox) => builder = builder.cc(mailbox),
                Err(err) => warn!(error = %err, "skipping unparsable cc address"),
            }
        }
        let body = MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(mail.body.text.clone()),
            )
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(mail.body.html.clone()),
            );
        builder
            .multipart(body)
            .map_err(|err| MailError::build(err.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse()
        .map_err(|err: lettre::address::AddressError| {
            MailError::address(address, err.to_string())
        })
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|err| MailError::send(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RenderedBody;

    fn transport(default_sender: Option<&str>) -> SmtpMailTransport {
        SmtpMailTransport::from_settings(&SmtpSettings {
            server: "localhost".into(),
            port: 2525,
            use_tls: false,
            username: None,
            password: None,
            default_sender: default_sender.map(str::to_owned),
        })
        .expect("transport")
    }

    fn mail(from: Option<&str>, to: &str) -> OutgoingMail {
        OutgoingMail {
            from: from.map(str::to_owned),
            to: vec![to.to_owned()],
            cc: vec!["it@example.com".into()],
            subject: "Warranty Expiry Notice".into(),
            body: RenderedBody {
                text: "plain".into(),
                html: "<p>html</p>".into(),
            },
        }
    }

    #[tokio::test]
    async fn falls_back_to_default_sender() {
        let message = transport(Some("desk@example.com"))
            .build_message(&mail(None, "ama@example.com"))
            .expect("message");
        let rendered = String::from_utf8(message.formatted()).expect("utf8");
        assert!(rendered.contains("From: desk@example.com"));
        assert!(rendered.contains("Cc: it@example.com"));
    }

    #[tokio::test]
    async fn missing_sender_is_a_build_error() {
        let err = transport(None)
            .build_message(&mail(None, "ama@example.com"))
            .expect_err("no sender");
        assert!(matches!(err, MailError::Build { .. }));
    }

    #[tokio::test]
    async fn malformed_recipient_is_an_address_error() {
        let err = transport(None)
            .build_message(&mail(Some("desk@example.com"), "not an address"))
            .expect_err("bad address");
        assert!(matches!(err, MailError::Address { .. }));
    }

    #[tokio::test]
    async fn malformed_cc_is_dropped() {
        let mut outgoing = mail(Some("desk@example.com"), "ama@example.com");
        outgoing.cc.push("audit team@".into());
        let message = transport(None).build_message(&outgoing).expect("message");
        let rendered = String::from_utf8(message.formatted()).expect("utf8");
        assert!(rendered.contains("To: ama@example.com"));
        assert!(rendered.contains("Cc: it@example.com"));
        assert!(!rendered.contains("audit"));
    }
}
