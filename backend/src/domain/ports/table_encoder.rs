//! Driven port serialising an export table into a downloadable file.

use crate::domain::{Error, ExportTable};

use super::define_port_error;

define_port_error! {
    /// Failures raised by table encoders.
    pub enum EncodeError {
        /// Writing the document failed.
        Write { message: String } => "export encoding failed: {message}",
    }
}

impl From<EncodeError> for Error {
    fn from(value: EncodeError) -> Self {
        tracing::error!(error = %value, "export encoding failed");
        Self::internal(value.to_string())
    }
}

/// Encodes a header row plus data rows in one file format.
#[cfg_attr(test, mockall::automock)]
pub trait TableEncoder: Send + Sync {
    /// MIME type of the produced document.
    fn content_type(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Encode `table`.
    fn encode(&self, table: &ExportTable) -> Result<Vec<u8>, EncodeError>;
}
