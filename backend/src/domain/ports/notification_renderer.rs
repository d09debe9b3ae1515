//! Driven port turning expiring records into a message body.

use chrono::{DateTime, Utc};

use crate::domain::notifications::{ExpiringItem, RecordKind};

use super::define_port_error;

define_port_error! {
    /// Failures raised by renderers.
    pub enum RenderError {
        /// The template could not be produced.
        Template { message: String } => "notification template failed: {message}",
    }
}

/// Everything a renderer may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Licence or warranty notice.
    pub kind: RecordKind,
    /// Records listed in this message.
    pub records: Vec<ExpiringItem>,
    /// Greeting name: employee name, user name or address.
    pub recipient_display_name: String,
    /// Effective look-ahead window.
    pub window_days: u32,
    /// Time the batch started.
    pub current_time: DateTime<Utc>,
}

/// Plain-text and HTML renditions of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBody {
    /// `text/plain` part.
    pub text: String,
    /// `text/html` part.
    pub html: String,
}

/// Produces message bodies; markup is the adapter's concern.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationRenderer: Send + Sync {
    /// Render one message.
    fn render(&self, context: &RenderContext) -> Result<RenderedBody, RenderError>;
}
