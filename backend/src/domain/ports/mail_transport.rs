//! Driven port for outbound email.
//!
//! The notification engine builds [`OutgoingMail`] values and hands them to a
//! transport one at a time; a failure affects only that message.

use async_trait::async_trait;

use super::{RenderedBody, define_port_error};

define_port_error! {
    /// Failures raised by mail transports.
    pub enum MailError {
        /// An address could not be parsed.
        Address { address: String, message: String } => "invalid address {address}: {message}",
        /// Message assembly failed.
        Build { message: String } => "could not build message: {message}",
        /// The relay refused or the connection failed.
        Send { message: String } => "mail delivery failed: {message}",
    }
}

/// One message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Sender; the transport default applies when `None`.
    pub from: Option<String>,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Rendered body.
    pub body: RenderedBody,
}

/// Delivers a single message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send `mail`, returning once the relay accepted or rejected it.
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}
