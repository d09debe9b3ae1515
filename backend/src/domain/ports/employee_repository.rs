//! Port abstraction for employee persistence.
use async_trait::async_trait;

use crate::domain::{Employee, EmployeeDraft, EmployeeId};

use super::StoreError;

/// Employee storage. Lists are ordered by ascending id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert a new employee.
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, StoreError>;

    /// Overwrite an employee's fields.
    async fn update(&self, id: EmployeeId, draft: &EmployeeDraft)
    -> Result<Employee, StoreError>;

    /// Remove an employee; their assets and licences become unassigned.
    async fn delete(&self, id: EmployeeId) -> Result<(), StoreError>;

    /// Fetch one employee.
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// Fetch the employees among `ids` that still exist.
    async fn find_many(&self, ids: &[EmployeeId]) -> Result<Vec<Employee>, StoreError>;

    /// First employee whose trimmed contact equals `contact`, ignoring case.
    async fn find_by_contact(&self, contact: &str) -> Result<Option<Employee>, StoreError>;

    /// All employees.
    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    /// Number of employees.
    async fn count(&self) -> Result<i64, StoreError>;
}
