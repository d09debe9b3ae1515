//! Error shared by every repository port and its HTTP mapping.

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by repository adapters.
    pub enum StoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "store query failed: {message}",
        /// Update or delete addressed a row that does not exist.
        NotFound { entity: String } => "{entity} not found",
        /// A unique column already holds the value.
        Duplicate { message: String } => "{message}",
        /// A foreign key names a row that does not exist.
        MissingReference { message: String } => "{message}",
    }
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Connection { .. } => {
                tracing::error!(error = %value, "store unavailable");
                Self::service_unavailable("Database unavailable")
            }
            StoreError::Query { .. } => {
                tracing::error!(error = %value, "store query failed");
                Self::internal(value.to_string())
            }
            StoreError::NotFound { .. } => Self::not_found(value.to_string()),
            StoreError::Duplicate { .. } => Self::conflict(value.to_string()),
            StoreError::MissingReference { .. } => Self::invalid_request(value.to_string()),
        }
    }
}
