//! Port abstraction for maintenance persistence, including the one-shot
//! approval transition.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    ApprovalOutcome, Maintenance, MaintenanceDraft, MaintenanceId, Money, UserId,
};

use super::StoreError;

/// Approval filter for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalFilter {
    /// Only pending records.
    Pending,
    /// Only approved records.
    Approved,
}

/// Sort order for maintenance listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaintenanceOrder {
    /// Oldest service date first; undated last.
    #[default]
    DateAsc,
    /// Newest service date first; undated last.
    DateDesc,
    /// Most recently approved first.
    ApprovedAtDesc,
}

/// Filter and ordering for maintenance listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceQuery {
    /// Approval filter.
    pub approval: Option<ApprovalFilter>,
    /// Sort order.
    pub order: MaintenanceOrder,
    /// Maximum rows returned.
    pub limit: Option<i64>,
}

/// Maintenance storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Insert a new, pending record.
    async fn create(&self, draft: &MaintenanceDraft) -> Result<Maintenance, StoreError>;

    /// Overwrite asset, date, description and cost; approval is untouched.
    async fn update(
        &self,
        id: MaintenanceId,
        draft: &MaintenanceDraft,
    ) -> Result<Maintenance, StoreError>;

    /// Remove a record.
    async fn delete(&self, id: MaintenanceId) -> Result<(), StoreError>;

    /// Fetch one record.
    async fn find_by_id(&self, id: MaintenanceId) -> Result<Option<Maintenance>, StoreError>;

    /// Records matching `query`.
    async fn list(&self, query: &MaintenanceQuery) -> Result<Vec<Maintenance>, StoreError>;

    /// Number of records.
    async fn count(&self) -> Result<i64, StoreError>;

    /// Sum of all costs.
    async fn total_cost(&self) -> Result<Money, StoreError>;

    /// Approve a pending record atomically.
    ///
    /// A record that is already approved is returned unchanged as
    /// [`ApprovalOutcome::AlreadyApproved`].
    async fn approve(
        &self,
        id: MaintenanceId,
        approver: UserId,
        at: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, StoreError>;
}
