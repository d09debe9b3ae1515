//! Port abstraction for software licence persistence.
use async_trait::async_trait;

use crate::domain::{DateRange, EmployeeId, LicenseDraft, LicenseId, SoftwareLicense};

use super::StoreError;

/// Sort order for licence listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LicenseOrder {
    /// Ascending id.
    #[default]
    IdAsc,
    /// Soonest expiry first; undated licences last.
    ExpiryAsc,
}

/// Filter and ordering for licence listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseQuery {
    /// Only licences assigned to this employee.
    pub assigned_to: Option<EmployeeId>,
    /// Only licences expiring within the range.
    pub expiring_within: Option<DateRange>,
    /// Only licences expiring on or after this date.
    pub expiring_from: Option<chrono::NaiveDate>,
    /// Sort order.
    pub order: LicenseOrder,
    /// Maximum rows returned.
    pub limit: Option<i64>,
}

impl LicenseQuery {
    /// Licences expiring within `range`, soonest first.
    pub fn expiring(range: DateRange) -> Self {
        Self {
            expiring_within: Some(range),
            order: LicenseOrder::ExpiryAsc,
            ..Self::default()
        }
    }
}

/// Licence storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Insert a new licence.
    async fn create(&self, draft: &LicenseDraft) -> Result<SoftwareLicense, StoreError>;

    /// Overwrite a licence's fields.
    async fn update(
        &self,
        id: LicenseId,
        draft: &LicenseDraft,
    ) -> Result<SoftwareLicense, StoreError>;

    /// Remove a licence.
    async fn delete(&self, id: LicenseId) -> Result<(), StoreError>;

    /// Fetch one licence.
    async fn find_by_id(&self, id: LicenseId) -> Result<Option<SoftwareLicense>, StoreError>;

    /// Licences matching `query`.
    async fn list(&self, query: &LicenseQuery) -> Result<Vec<SoftwareLicense>, StoreError>;

    /// Number of licences matching `query`; ordering and limit are ignored.
    async fn count(&self, query: &LicenseQuery) -> Result<i64, StoreError>;
}
