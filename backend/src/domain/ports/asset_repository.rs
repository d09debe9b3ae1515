//! Port abstraction for asset persistence and the aggregates dashboards use.
use async_trait::async_trait;

use crate::domain::{Asset, AssetDetails, AssetId, DateRange, EmployeeId, NewAsset};

use super::{GroupCount, StoreError};

/// Sort order for asset listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssetOrder {
    /// Ascending id.
    #[default]
    IdAsc,
    /// Soonest warranty expiry first; undated assets last.
    WarrantyExpiryAsc,
}

/// Column used by [`AssetRepository::group_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetGrouping {
    /// Group on `asset_type`.
    Type,
    /// Group on `status`.
    Status,
}

/// Filter and ordering for asset listings. Empty means "all, by id".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    /// Only assets assigned to this employee.
    pub assigned_to: Option<EmployeeId>,
    /// Only assets with exactly this status.
    pub status: Option<String>,
    /// Only assets whose warranty expires within the range.
    pub warranty_within: Option<DateRange>,
    /// Sort order.
    pub order: AssetOrder,
    /// Maximum rows returned.
    pub limit: Option<i64>,
}

impl AssetQuery {
    /// Assets whose warranty ends within `range`, soonest first.
    pub fn warranty_expiring(range: DateRange) -> Self {
        Self {
            warranty_within: Some(range),
            order: AssetOrder::WarrantyExpiryAsc,
            ..Self::default()
        }
    }
}

/// Asset storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Insert a new asset. Fails with [`StoreError::Duplicate`] on a reused
    /// tag and [`StoreError::MissingReference`] on an unknown assignee.
    async fn create(&self, asset: &NewAsset) -> Result<Asset, StoreError>;

    /// Overwrite the mutable attributes; the tag is untouched.
    async fn update(&self, id: AssetId, details: &AssetDetails) -> Result<Asset, StoreError>;

    /// Remove an asset; its maintenance records lose the reference.
    async fn delete(&self, id: AssetId) -> Result<(), StoreError>;

    /// Fetch one asset.
    async fn find_by_id(&self, id: AssetId) -> Result<Option<Asset>, StoreError>;

    /// Assets matching `query`.
    async fn list(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError>;

    /// Number of assets matching `query`; ordering and limit are ignored.
    async fn count(&self, query: &AssetQuery) -> Result<i64, StoreError>;

    /// Asset counts per distinct value of `grouping`, ordered by label with
    /// `None` last.
    async fn group_count(&self, grouping: AssetGrouping) -> Result<Vec<GroupCount>, StoreError>;
}
