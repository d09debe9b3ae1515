//! CRUD use-cases for employees, assets, maintenance records and licences.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{
    AssetQuery, AssetRepository, EmployeeRepository, LicenseQuery, LicenseRepository,
    MaintenanceQuery, MaintenanceRepository,
};
use crate::domain::{
    ApprovalOutcome, Asset, AssetId, AssetInput, Employee, EmployeeDraft, EmployeeId,
    EmployeeInput, Error, LicenseDraft, LicenseId, LicenseInput, Maintenance, MaintenanceDraft,
    MaintenanceId, MaintenanceInput, SoftwareLicense, User,
};

/// Repositories backing the inventory.
#[derive(Clone)]
pub struct InventoryPorts {
    pub employees: Arc<dyn EmployeeRepository>,
    pub assets: Arc<dyn AssetRepository>,
    pub maintenance: Arc<dyn MaintenanceRepository>,
    pub licenses: Arc<dyn LicenseRepository>,
}

/// Inventory use-cases. Input is validated before any repository call.
#[derive(Clone)]
pub struct InventoryService {
    ports: InventoryPorts,
    clock: Arc<dyn Clock>,
}

fn missing(entity: &str) -> Error {
    Error::not_found(format!("{entity} not found"))
}

impl InventoryService {
    pub fn new(ports: InventoryPorts) -> Self {
        Self {
            ports,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Replace the clock used to stamp approvals.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // Employees

    pub async fn list_employees(&self) -> Result<Vec<Employee>, Error> {
        Ok(self.ports.employees.list().await?)
    }

    pub async fn employee(&self, id: EmployeeId) -> Result<Employee, Error> {
        self.ports
            .employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| missing("Employee"))
    }

    pub async fn create_employee(&self, input: EmployeeInput) -> Result<Employee, Error> {
        let draft = EmployeeDraft::try_from(input)?;
        let employee = self.ports.employees.create(&draft).await?;
        info!(employee_id = %employee.id, "employee added");
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        id: EmployeeId,
        input: EmployeeInput,
    ) -> Result<Employee, Error> {
        let draft = EmployeeDraft::try_from(input)?;
        Ok(self.ports.employees.update(id, &draft).await?)
    }

    /// Deleting an employee unassigns their assets and licences.
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), Error> {
        self.ports.employees.delete(id).await?;
        info!(employee_id = %id, "employee deleted");
        Ok(())
    }

    // Assets

    pub async fn list_assets(&self) -> Result<Vec<Asset>, Error> {
        Ok(self.ports.assets.list(&AssetQuery::default()).await?)
    }

    pub async fn asset(&self, id: AssetId) -> Result<Asset, Error> {
        self.ports
            .assets
            .find_by_id(id)
            .await?
            .ok_or_else(|| missing("Asset"))
    }

    pub async fn create_asset(&self, input: AssetInput) -> Result<Asset, Error> {
        let new_asset = input.into_new_asset()?;
        let asset = self.ports.assets.create(&new_asset).await?;
        info!(asset_id = %asset.id, tag = %asset.asset_tag, "asset added");
        Ok(asset)
    }

    /// Update everything but the asset tag, which is fixed at creation.
    pub async fn update_asset(&self, id: AssetId, input: AssetInput) -> Result<Asset, Error> {
        let details = input.details()?;
        Ok(self.ports.assets.update(id, &details).await?)
    }

    pub async fn delete_asset(&self, id: AssetId) -> Result<(), Error> {
        self.ports.assets.delete(id).await?;
        info!(asset_id = %id, "asset deleted");
        Ok(())
    }

    // Maintenance

    /// All records, oldest date first.
    pub async fn list_maintenance(&self) -> Result<Vec<Maintenance>, Error> {
        Ok(self
            .ports
            .maintenance
            .list(&MaintenanceQuery::default())
            .await?)
    }

    pub async fn maintenance(&self, id: MaintenanceId) -> Result<Maintenance, Error> {
        self.ports
            .maintenance
            .find_by_id(id)
            .await?
            .ok_or_else(|| missing("Maintenance record"))
    }

    /// New records start out pending.
    pub async fn create_maintenance(&self, input: MaintenanceInput) -> Result<Maintenance, Error> {
        let draft = MaintenanceDraft::try_from(input)?;
        let record = self.ports.maintenance.create(&draft).await?;
        info!(maintenance_id = %record.id, "maintenance record added");
        Ok(record)
    }

    /// Edits leave the approval state untouched.
    pub async fn update_maintenance(
        &self,
        id: MaintenanceId,
        input: MaintenanceInput,
    ) -> Result<Maintenance, Error> {
        let draft = MaintenanceDraft::try_from(input)?;
        Ok(self.ports.maintenance.update(id, &draft).await?)
    }

    pub async fn delete_maintenance(&self, id: MaintenanceId) -> Result<(), Error> {
        self.ports.maintenance.delete(id).await?;
        info!(maintenance_id = %id, "maintenance record deleted");
        Ok(())
    }

    /// Approve a pending record once; repeat calls report `AlreadyApproved`.
    pub async fn approve_maintenance(
        &self,
        id: MaintenanceId,
        approver: &User,
    ) -> Result<ApprovalOutcome, Error> {
        let outcome = self
            .ports
            .maintenance
            .approve(id, approver.id(), self.clock.utc())
            .await?;
        if let ApprovalOutcome::Approved(record) = &outcome {
            info!(maintenance_id = %record.id, approver = %approver.id(), "maintenance approved");
        }
        Ok(outcome)
    }

    // Licences

    pub async fn list_licenses(&self) -> Result<Vec<SoftwareLicense>, Error> {
        Ok(self.ports.licenses.list(&LicenseQuery::default()).await?)
    }

    pub async fn license(&self, id: LicenseId) -> Result<SoftwareLicense, Error> {
        self.ports
            .licenses
            .find_by_id(id)
            .await?
            .ok_or_else(|| missing("License"))
    }

    pub async fn create_license(&self, input: LicenseInput) -> Result<SoftwareLicense, Error> {
        let draft = LicenseDraft::try_from(input)?;
        let license = self.ports.licenses.create(&draft).await?;
        info!(license_id = %license.id, "license added");
        Ok(license)
    }

    pub async fn update_license(
        &self,
        id: LicenseId,
        input: LicenseInput,
    ) -> Result<SoftwareLicense, Error> {
        let draft = LicenseDraft::try_from(input)?;
        Ok(self.ports.licenses.update(id, &draft).await?)
    }

    pub async fn delete_license(&self, id: LicenseId) -> Result<(), Error> {
        self.ports.licenses.delete(id).await?;
        info!(license_id = %id, "license deleted");
        Ok(())
    }
}
