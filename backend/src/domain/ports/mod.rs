//! Domain ports: repository contracts for the store and driven adapters for
//! hashing, mail, rendering and export encoding.

mod macros;
pub(crate) use macros::define_port_error;

mod asset_repository;
mod employee_repository;
mod license_repository;
mod mail_transport;
mod maintenance_repository;
mod notification_renderer;
mod password_hasher;
mod store_error;
mod table_encoder;
mod user_repository;

use serde::Serialize;

#[cfg(test)]
pub use asset_repository::MockAssetRepository;
pub use asset_repository::{AssetGrouping, AssetOrder, AssetQuery, AssetRepository};
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::EmployeeRepository;
#[cfg(test)]
pub use license_repository::MockLicenseRepository;
pub use license_repository::{LicenseOrder, LicenseQuery, LicenseRepository};
#[cfg(test)]
pub use mail_transport::MockMailTransport;
pub use mail_transport::{MailError, MailTransport, OutgoingMail};
#[cfg(test)]
pub use maintenance_repository::MockMaintenanceRepository;
pub use maintenance_repository::{
    ApprovalFilter, MaintenanceOrder, MaintenanceQuery, MaintenanceRepository,
};
#[cfg(test)]
pub use notification_renderer::MockNotificationRenderer;
pub use notification_renderer::{NotificationRenderer, RenderContext, RenderError, RenderedBody};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use store_error::StoreError;
#[cfg(test)]
pub use table_encoder::MockTableEncoder;
pub use table_encoder::{EncodeError, TableEncoder};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;

/// One bucket of a group-by-count aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    /// Grouped value; `None` for rows where the column is null.
    pub label: Option<String>,
    /// Rows in the bucket.
    pub count: i64,
}

impl GroupCount {
    /// Label shown on dashboards, with `"Unknown"` standing in for null.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("Unknown")
    }
}
