//! PostgreSQL-backed `AssetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    AssetGrouping, AssetOrder, AssetQuery, AssetRepository, GroupCount, StoreError,
};
use crate::domain::{Asset, AssetDetails, AssetId, NewAsset};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{AssetChanges, AssetRow, NewAssetRow};
use super::pool::DbPool;
use super::schema::assets;

const ENTITY: &str = "Asset";

/// Diesel-backed implementation of the `AssetRepository` port.
#[derive(Clone)]
pub struct DieselAssetRepository {
    pool: DbPool,
}

impl DieselAssetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Apply the filter part of `query`; ordering and limit are left to callers.
fn filtered(query: &AssetQuery) -> assets::BoxedQuery<'_, Pg> {
    let mut statement = assets::table.into_boxed();
    if let Some(employee) = query.assigned_to {
        statement = statement.filter(assets::assigned_to.eq(employee.get()));
    }
    if let Some(status) = query.status.as_deref() {
        statement = statement.filter(assets::status.eq(status));
    }
    if let Some(range) = query.warranty_within {
        statement = statement.filter(assets::warranty_expiry.between(range.start(), range.end()));
    }
    statement
}

#[async_trait]
impl AssetRepository for DieselAssetRepository {
    async fn create(&self, asset: &NewAsset) -> Result<Asset, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(assets::table)
            .values(&NewAssetRow::from(asset))
            .returning(AssetRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Asset::from)
            .map_err(map_diesel_error)
    }

    async fn update(&self, id: AssetId, details: &AssetDetails) -> Result<Asset, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AssetRow> = diesel::update(assets::table.find(id.get()))
            .set(&AssetChanges::from(details))
            .returning(AssetRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Asset::from)
            .ok_or_else(|| StoreError::not_found(ENTITY))
    }

    async fn delete(&self, id: AssetId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(assets::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(StoreError::not_found(ENTITY));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: AssetId) -> Result<Option<Asset>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<AssetRow> = assets::table
            .find(id.get())
            .select(AssetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Asset::from))
    }

    async fn list(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError> {
        let mut statement = match query.order {
            AssetOrder::IdAsc => filtered(query).order(assets::id.asc()),
            AssetOrder::WarrantyExpiryAsc => filtered(query)
                .order((assets::warranty_expiry.asc().nulls_last(), assets::id.asc())),
        };
        if let Some(limit) = query.limit {
            statement = statement.limit(limit);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AssetRow> = statement
            .select(AssetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Asset::from).collect())
    }

    async fn count(&self, query: &AssetQuery) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        filtered(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn group_count(&self, grouping: AssetGrouping) -> Result<Vec<GroupCount>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Option<String>, i64)> = match grouping {
            AssetGrouping::Type => {
                assets::table
                    .group_by(assets::asset_type)
                    .select((assets::asset_type, diesel::dsl::count_star()))
                    .order(assets::asset_type.asc().nulls_last())
                    .load(&mut conn)
                    .await
            }
            AssetGrouping::Status => {
                assets::table
                    .group_by(assets::status)
                    .select((assets::status, diesel::dsl::count_star()))
                    .order(assets::status.asc().nulls_last())
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(label, count)| GroupCount { label, count })
            .collect())
    }
}
