//! PostgreSQL-backed `MaintenanceRepository` implementation using Diesel ORM.
//!
//! Approval is a single conditional `UPDATE ... WHERE status = 'Pending'`, so
//! two concurrent approvals cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    ApprovalFilter, MaintenanceOrder, MaintenanceQuery, MaintenanceRepository, StoreError,
};
use crate::domain::{
    ApprovalOutcome, Maintenance, MaintenanceDraft, MaintenanceId, Money, UserId,
};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{MaintenanceChanges, MaintenanceRow, STATUS_APPROVED, STATUS_PENDING};
use super::pool::DbPool;
use super::schema::maintenance;

const ENTITY: &str = "Maintenance record";

/// Diesel-backed implementation of the `MaintenanceRepository` port.
#[derive(Clone)]
pub struct DieselMaintenanceRepository {
    pool: DbPool,
}

impl DieselMaintenanceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepository for DieselMaintenanceRepository {
    async fn create(&self, draft: &MaintenanceDraft) -> Result<Maintenance, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(maintenance::table)
            .values(&MaintenanceChanges::from(draft))
            .returning(MaintenanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Maintenance::from)
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: MaintenanceId,
        draft: &MaintenanceDraft,
    ) -> Result<Maintenance, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MaintenanceRow> = diesel::update(maintenance::table.find(id.get()))
            .set(&MaintenanceChanges::from(draft))
            .returning(MaintenanceRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Maintenance::from)
            .ok_or_else(|| StoreError::not_found(ENTITY))
    }

    async fn delete(&self, id: MaintenanceId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(maintenance::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(StoreError::not_found(ENTITY));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: MaintenanceId) -> Result<Option<Maintenance>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<MaintenanceRow> = maintenance::table
            .find(id.get())
            .select(MaintenanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Maintenance::from))
    }

    async fn list(&self, query: &MaintenanceQuery) -> Result<Vec<Maintenance>, StoreError> {
        let mut statement = maintenance::table.into_boxed();
        statement = match query.approval {
            None => statement,
            Some(ApprovalFilter::Pending) => {
                statement.filter(maintenance::status.eq(STATUS_PENDING))
            }
            Some(ApprovalFilter::Approved) => {
                statement.filter(maintenance::status.eq(STATUS_APPROVED))
            }
        };
        statement = match query.order {
            MaintenanceOrder::DateAsc => statement.order((
                maintenance::service_date.asc().nulls_last(),
                maintenance::id.asc(),
            )),
            MaintenanceOrder::DateDesc => statement.order((
                maintenance::service_date.desc().nulls_last(),
                maintenance::id.asc(),
            )),
            MaintenanceOrder::ApprovedAtDesc => statement.order((
                maintenance::approved_at.desc().nulls_last(),
                maintenance::id.asc(),
            )),
        };
        if let Some(limit) = query.limit {
            statement = statement.limit(limit);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MaintenanceRow> = statement
            .select(MaintenanceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Maintenance::from).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        maintenance::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn total_cost(&self) -> Result<Money, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // SUM(BIGINT) is NUMERIC in PostgreSQL; adding in cents avoids it.
        let costs: Vec<i64> = maintenance::table
            .select(maintenance::cost_cents)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(costs
            .into_iter()
            .filter_map(Money::from_cents)
            .fold(Money::ZERO, Money::saturating_add))
    }

    async fn approve(
        &self,
        id: MaintenanceId,
        approver: UserId,
        at: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let approved: Option<MaintenanceRow> = diesel::update(
            maintenance::table
                .find(id.get())
                .filter(maintenance::status.eq(STATUS_PENDING)),
        )
        .set((
            maintenance::status.eq(STATUS_APPROVED),
            maintenance::approved_by.eq(Some(approver.get())),
            maintenance::approved_at.eq(Some(at)),
        ))
        .returning(MaintenanceRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = approved {
            return Ok(ApprovalOutcome::Approved(row.into()));
        }

        let current: Option<MaintenanceRow> = maintenance::table
            .find(id.get())
            .select(MaintenanceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        current
            .map(|row| ApprovalOutcome::AlreadyApproved(row.into()))
            .ok_or_else(|| StoreError::not_found(ENTITY))
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage for approval columns.
    use super::*;
    use crate::domain::Approval;
    use chrono::TimeZone;

    fn row(status: &str, approved_at: Option<DateTime<Utc>>) -> MaintenanceRow {
        MaintenanceRow {
            id: 1,
            asset_id: None,
            service_date: None,
            description: None,
            cost_cents: 995,
            status: status.into(),
            approved_by: Some(4),
            approved_at,
        }
    }

    #[test]
    fn approved_rows_carry_approver_and_time() {
        let at = Utc
            .with_ymd_and_hms(2025, 2, 3, 10, 0, 0)
            .single()
            .expect("valid time");
        let record = Maintenance::from(row(STATUS_APPROVED, Some(at)));
        assert_eq!(
            record.approval,
            Approval::Approved {
                by: Some(UserId::new(4)),
                at
            }
        );
        assert_eq!(record.cost.to_string(), "9.95");
    }

    #[test]
    fn approved_without_timestamp_reads_as_pending() {
        let record = Maintenance::from(row(STATUS_APPROVED, None));
        assert!(record.approval.is_pending());
    }
}
