//! PostgreSQL-backed `EmployeeRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EmployeeRepository, StoreError};
use crate::domain::{Employee, EmployeeDraft, EmployeeId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{EmployeeChanges, EmployeeRow};
use super::pool::DbPool;
use super::schema::employees;

const ENTITY: &str = "Employee";

diesel::define_sql_function!(fn lower(value: Nullable<Text>) -> Nullable<Text>);
diesel::define_sql_function!(fn btrim(value: Nullable<Text>) -> Nullable<Text>);

/// Diesel-backed implementation of the `EmployeeRepository` port.
#[derive(Clone)]
pub struct DieselEmployeeRepository {
    pool: DbPool,
}

impl DieselEmployeeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for DieselEmployeeRepository {
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(employees::table)
            .values(&EmployeeChanges::from(draft))
            .returning(EmployeeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Employee::from)
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Employee, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = diesel::update(employees::table.find(id.get()))
            .set(&EmployeeChanges::from(draft))
            .returning(EmployeeRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Employee::from)
            .ok_or_else(|| StoreError::not_found(ENTITY))
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(employees::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(StoreError::not_found(ENTITY));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .find(id.get())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Employee::from))
    }

    async fn find_many(&self, ids: &[EmployeeId]) -> Result<Vec<Employee>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .filter(employees::id.eq_any(raw))
            .order(employees::id.asc())
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn find_by_contact(&self, contact: &str) -> Result<Option<Employee>, StoreError> {
        let wanted = contact.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(None);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EmployeeRow> = employees::table
            .filter(lower(btrim(employees::contact)).eq(wanted))
            .order(employees::id.asc())
            .select(EmployeeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Employee::from))
    }

    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EmployeeRow> = employees::table
            .order(employees::id.asc())
            .select(EmployeeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        employees::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
