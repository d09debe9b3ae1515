//! Domain entities, validation rules, services and ports.
//!
//! Nothing here depends on actix, diesel or lettre: inbound adapters call the
//! services, and outbound adapters implement the traits in [`ports`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: error payload shared by every adapter.
//! - `User`, `Role`, `AccessDecision`: identity and role gates.
//! - `Employee`, `Asset`, `Maintenance`, `SoftwareLicense`: inventory records.
//! - `IdentityService`, `InventoryService`, `ReportService`, `ExpiryNotifier`:
//!   use-cases wired at startup.

pub mod access;
pub mod asset;
pub mod auth;
pub mod date_range;
pub mod employee;
pub mod error;
pub mod export;
pub mod fields;
pub mod identity_service;
pub mod ids;
pub mod inventory_service;
pub mod license;
pub mod maintenance;
pub mod money;
pub mod notifications;
pub mod ports;
pub mod reports;
pub mod role;
pub mod trace_id;
pub mod user;

pub use self::access::{ACCESS_DENIED, AccessDecision, LOGIN_PATH, authorize};
pub use self::asset::{Asset, AssetDetails, AssetInput, NewAsset};
pub use self::auth::{
    AuthFailure, LoginCredentials, LoginValidationError, MIN_PASSWORD_LEN, PasswordChange,
    PasswordChangeError, Registration, RegistrationError, validate_reset_password,
};
pub use self::date_range::DateRange;
pub use self::employee::{Employee, EmployeeDraft, EmployeeInput};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::export::{
    ExportEntity, ExportFormat, ExportTable, SPREADSHEET_UNAVAILABLE, SpreadsheetCapability,
};
pub use self::identity_service::{IdentityService, SELF_DELETE_FORBIDDEN};
pub use self::ids::{AssetId, EmployeeId, LicenseId, MaintenanceId, UserId};
pub use self::inventory_service::{InventoryPorts, InventoryService};
pub use self::license::{LicenseDraft, LicenseInput, SoftwareLicense};
pub use self::maintenance::{
    Approval, ApprovalOutcome, Maintenance, MaintenanceDraft, MaintenanceInput,
};
pub use self::money::{Money, MoneyParseError};
pub use self::notifications::{
    ExpiringItem, ExpiryNotifier, MailCapability, NotificationError, NotificationOptions,
    NotificationSettings, NotificationSummary, NotifierPorts, RecordKind, contains_at_sign,
};
pub use self::reports::{
    AdminDashboard, EmployeeDashboard, ItDashboard, ManagerDashboard, NotificationCentre,
    ReportService, ReportsOverview,
};
pub use self::role::{Role, RoleParseError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, PasswordHash, User};

/// Convenient result alias for domain operations.
///
/// # Examples
/// ```
/// use itam::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("Asset not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
