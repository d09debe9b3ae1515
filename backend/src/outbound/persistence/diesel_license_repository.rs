//! PostgreSQL-backed `LicenseRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LicenseOrder, LicenseQuery, LicenseRepository, StoreError};
use crate::domain::{LicenseDraft, LicenseId, SoftwareLicense};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{LicenseChanges, LicenseRow};
use super::pool::DbPool;
use super::schema::software_licenses;

const ENTITY: &str = "License";

/// Diesel-backed implementation of the `LicenseRepository` port.
#[derive(Clone)]
pub struct DieselLicenseRepository {
    pool: DbPool,
}

impl DieselLicenseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(query: &LicenseQuery) -> software_licenses::BoxedQuery<'static, Pg> {
    let mut statement = software_licenses::table.into_boxed();
    if let Some(employee) = query.assigned_to {
        statement = statement.filter(software_licenses::assigned_to.eq(employee.get()));
    }
    if let Some(range) = query.expiring_within {
        statement = statement
            .filter(software_licenses::expiry_date.between(range.start(), range.end()));
    }
    if let Some(from) = query.expiring_from {
        statement = statement.filter(software_licenses::expiry_date.ge(from));
    }
    statement
}

#[async_trait]
impl LicenseRepository for DieselLicenseRepository {
    async fn create(&self, draft: &LicenseDraft) -> Result<SoftwareLicense, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(software_licenses::table)
            .values(&LicenseChanges::from(draft))
            .returning(LicenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(SoftwareLicense::from)
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: LicenseId,
        draft: &LicenseDraft,
    ) -> Result<SoftwareLicense, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LicenseRow> = diesel::update(software_licenses::table.find(id.get()))
            .set(&LicenseChanges::from(draft))
            .returning(LicenseRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(SoftwareLicense::from)
            .ok_or_else(|| StoreError::not_found(ENTITY))
    }

    async fn delete(&self, id: LicenseId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(software_licenses::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(StoreError::not_found(ENTITY));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: LicenseId) -> Result<Option<SoftwareLicense>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LicenseRow> = software_licenses::table
            .find(id.get())
            .select(LicenseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(SoftwareLicense::from))
    }

    async fn list(&self, query: &LicenseQuery) -> Result<Vec<SoftwareLicense>, StoreError> {
        let mut statement = match query.order {
            LicenseOrder::IdAsc => filtered(query).order(software_licenses::id.asc()),
            LicenseOrder::ExpiryAsc => filtered(query).order((
                software_licenses::expiry_date.asc().nulls_last(),
                software_licenses::id.asc(),
            )),
        };
        if let Some(limit) = query.limit {
            statement = statement.limit(limit);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LicenseRow> = statement
            .select(LicenseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(SoftwareLicense::from).collect())
    }

    async fn count(&self, query: &LicenseQuery) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        filtered(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
