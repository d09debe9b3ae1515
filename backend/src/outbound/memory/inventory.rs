//! Inventory repositories over the in-memory tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    MemoryStore, Tables, apply_limit, count_of, group_counts, nulls_last, nulls_last_desc,
};
use crate::domain::ports::{
    ApprovalFilter, AssetGrouping, AssetOrder, AssetQuery, AssetRepository, EmployeeRepository,
    GroupCount, LicenseOrder, LicenseQuery, LicenseRepository, MaintenanceOrder,
    MaintenanceQuery, MaintenanceRepository, StoreError,
};
use crate::domain::{
    Approval, ApprovalOutcome, Asset, AssetDetails, AssetId, Employee, EmployeeDraft, EmployeeId,
    LicenseDraft, LicenseId, Maintenance, MaintenanceDraft, MaintenanceId, Money, NewAsset,
    SoftwareLicense, UserId,
};

fn require_employee(tables: &Tables, id: Option<EmployeeId>) -> Result<(), StoreError> {
    match id {
        Some(id) if !tables.employees.rows.contains_key(&id.get()) => Err(
            StoreError::missing_reference(format!("Employee {id} does not exist")),
        ),
        _ => Ok(()),
    }
}

fn require_asset(tables: &Tables, id: Option<AssetId>) -> Result<(), StoreError> {
    match id {
        Some(id) if !tables.assets.rows.contains_key(&id.get()) => Err(
            StoreError::missing_reference(format!("Asset {id} does not exist")),
        ),
        _ => Ok(()),
    }
}

fn normalise_contact(value: &str) -> String {
    value.trim().to_lowercase()
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee, StoreError> {
        let mut tables = self.tables()?;
        let id = EmployeeId::new(tables.employees.allocate());
        let employee = draft.clone().into_employee(id);
        tables.employees.rows.insert(id.get(), employee.clone());
        Ok(employee)
    }

    async fn update(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Employee, StoreError> {
        let mut tables = self.tables()?;
        let row = tables.employees.require_mut(id.get(), "Employee")?;
        *row = draft.clone().into_employee(id);
        Ok(row.clone())
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.employees.remove(id.get(), "Employee")?;
        for asset in tables.assets.rows.values_mut() {
            if asset.details.assigned_to == Some(id) {
                asset.details.assigned_to = None;
            }
        }
        for license in tables.licenses.rows.values_mut() {
            if license.assigned_to == Some(id) {
                license.assigned_to = None;
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        Ok(self.tables()?.employees.rows.get(&id.get()).cloned())
    }

    async fn find_many(&self, ids: &[EmployeeId]) -> Result<Vec<Employee>, StoreError> {
        Ok(self
            .tables()?
            .employees
            .rows
            .values()
            .filter(|employee| ids.contains(&employee.id))
            .cloned()
            .collect())
    }

    async fn find_by_contact(&self, contact: &str) -> Result<Option<Employee>, StoreError> {
        let wanted = normalise_contact(contact);
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .tables()?
            .employees
            .rows
            .values()
            .find(|employee| {
                employee
                    .contact
                    .as_deref()
                    .is_some_and(|value| normalise_contact(value) == wanted)
            })
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.tables()?.employees.rows.values().cloned().collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(count_of(self.tables()?.employees.rows.len()))
    }
}

fn asset_matches(asset: &Asset, query: &AssetQuery) -> bool {
    let details = &asset.details;
    query
        .assigned_to
        .is_none_or(|id| details.assigned_to == Some(id))
        && query
            .status
            .as_deref()
            .is_none_or(|status| details.status.as_deref() == Some(status))
        && query.warranty_within.is_none_or(|range| {
            details
                .warranty_expiry
                .is_some_and(|date| range.contains(date))
        })
}

fn select_assets(tables: &Tables, query: &AssetQuery) -> Vec<Asset> {
    let mut rows: Vec<Asset> = tables
        .assets
        .rows
        .values()
        .filter(|asset| asset_matches(asset, query))
        .cloned()
        .collect();
    if query.order == AssetOrder::WarrantyExpiryAsc {
        rows.sort_by(|a, b| {
            nulls_last(
                a.details.warranty_expiry.as_ref(),
                b.details.warranty_expiry.as_ref(),
            )
            .then(a.id.cmp(&b.id))
        });
    }
    rows
}

#[async_trait]
impl AssetRepository for MemoryStore {
    async fn create(&self, asset: &NewAsset) -> Result<Asset, StoreError> {
        let mut tables = self.tables()?;
        if tables
            .assets
            .rows
            .values()
            .any(|row| row.asset_tag == asset.asset_tag)
        {
            return Err(StoreError::duplicate("Asset ID already exists"));
        }
        require_employee(&tables, asset.details.assigned_to)?;
        let id = AssetId::new(tables.assets.allocate());
        let created = Asset {
            id,
            asset_tag: asset.asset_tag.clone(),
            details: asset.details.clone(),
        };
        tables.assets.rows.insert(id.get(), created.clone());
        Ok(created)
    }

    async fn update(&self, id: AssetId, details: &AssetDetails) -> Result<Asset, StoreError> {
        let mut tables = self.tables()?;
        if !tables.assets.rows.contains_key(&id.get()) {
            return Err(StoreError::not_found("Asset"));
        }
        require_employee(&tables, details.assigned_to)?;
        let row = tables.assets.require_mut(id.get(), "Asset")?;
        row.details = details.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: AssetId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.assets.remove(id.get(), "Asset")?;
        for record in tables.maintenance.rows.values_mut() {
            if record.asset_id == Some(id) {
                record.asset_id = None;
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: AssetId) -> Result<Option<Asset>, StoreError> {
        Ok(self.tables()?.assets.rows.get(&id.get()).cloned())
    }

    async fn list(&self, query: &AssetQuery) -> Result<Vec<Asset>, StoreError> {
        let rows = select_assets(&*self.tables()?, query);
        Ok(apply_limit(rows, query.limit))
    }

    async fn count(&self, query: &AssetQuery) -> Result<i64, StoreError> {
        Ok(count_of(select_assets(&*self.tables()?, query).len()))
    }

    async fn group_count(&self, grouping: AssetGrouping) -> Result<Vec<GroupCount>, StoreError> {
        let tables = self.tables()?;
        let labels = tables.assets.rows.values().map(|asset| match grouping {
            AssetGrouping::Type => asset.details.asset_type.as_deref(),
            AssetGrouping::Status => asset.details.status.as_deref(),
        });
        Ok(group_counts(labels))
    }
}

fn license_matches(license: &SoftwareLicense, query: &LicenseQuery) -> bool {
    query
        .assigned_to
        .is_none_or(|id| license.assigned_to == Some(id))
        && query
            .expiring_within
            .is_none_or(|range| license.expiry_date.is_some_and(|date| range.contains(date)))
        && query
            .expiring_from
            .is_none_or(|from| license.expiry_date.is_some_and(|date| date >= from))
}

fn select_licenses(tables: &Tables, query: &LicenseQuery) -> Vec<SoftwareLicense> {
    let mut rows: Vec<SoftwareLicense> = tables
        .licenses
        .rows
        .values()
        .filter(|license| license_matches(license, query))
        .cloned()
        .collect();
    if query.order == LicenseOrder::ExpiryAsc {
        rows.sort_by(|a, b| {
            nulls_last(a.expiry_date.as_ref(), b.expiry_date.as_ref()).then(a.id.cmp(&b.id))
        });
    }
    rows
}

#[async_trait]
impl LicenseRepository for MemoryStore {
    async fn create(&self, draft: &LicenseDraft) -> Result<SoftwareLicense, StoreError> {
        let mut tables = self.tables()?;
        require_employee(&tables, draft.assigned_to)?;
        let id = LicenseId::new(tables.licenses.allocate());
        let license = draft.clone().into_license(id);
        tables.licenses.rows.insert(id.get(), license.clone());
        Ok(license)
    }

    async fn update(
        &self,
        id: LicenseId,
        draft: &LicenseDraft,
    ) -> Result<SoftwareLicense, StoreError> {
        let mut tables = self.tables()?;
        if !tables.licenses.rows.contains_key(&id.get()) {
            return Err(StoreError::not_found("License"));
        }
        require_employee(&tables, draft.assigned_to)?;
        let row = tables.licenses.require_mut(id.get(), "License")?;
        *row = draft.clone().into_license(id);
        Ok(row.clone())
    }

    async fn delete(&self, id: LicenseId) -> Result<(), StoreError> {
        self.tables()?.licenses.remove(id.get(), "License")?;
        Ok(())
    }

    async fn find_by_id(&self, id: LicenseId) -> Result<Option<SoftwareLicense>, StoreError> {
        Ok(self.tables()?.licenses.rows.get(&id.get()).cloned())
    }

    async fn list(&self, query: &LicenseQuery) -> Result<Vec<SoftwareLicense>, StoreError> {
        let rows = select_licenses(&*self.tables()?, query);
        Ok(apply_limit(rows, query.limit))
    }

    async fn count(&self, query: &LicenseQuery) -> Result<i64, StoreError> {
        Ok(count_of(select_licenses(&*self.tables()?, query).len()))
    }
}

fn approved_at(record: &Maintenance) -> Option<DateTime<Utc>> {
    match record.approval {
        Approval::Approved { at, .. } => Some(at),
        Approval::Pending => None,
    }
}

fn approval_matches(record: &Maintenance, filter: Option<ApprovalFilter>) -> bool {
    match filter {
        None => true,
        Some(ApprovalFilter::Pending) => record.approval.is_pending(),
        Some(ApprovalFilter::Approved) => !record.approval.is_pending(),
    }
}

#[async_trait]
impl MaintenanceRepository for MemoryStore {
    async fn create(&self, draft: &MaintenanceDraft) -> Result<Maintenance, StoreError> {
        let mut tables = self.tables()?;
        require_asset(&tables, draft.asset_id)?;
        let id = MaintenanceId::new(tables.maintenance.allocate());
        let record = Maintenance {
            id,
            asset_id: draft.asset_id,
            date: draft.date,
            description: draft.description.clone(),
            cost: draft.cost,
            approval: Approval::Pending,
        };
        tables.maintenance.rows.insert(id.get(), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: MaintenanceId,
        draft: &MaintenanceDraft,
    ) -> Result<Maintenance, StoreError> {
        let mut tables = self.tables()?;
        if !tables.maintenance.rows.contains_key(&id.get()) {
            return Err(StoreError::not_found("Maintenance record"));
        }
        require_asset(&tables, draft.asset_id)?;
        let row = tables.maintenance.require_mut(id.get(), "Maintenance record")?;
        row.asset_id = draft.asset_id;
        row.date = draft.date;
        row.description = draft.description.clone();
        row.cost = draft.cost;
        Ok(row.clone())
    }

    async fn delete(&self, id: MaintenanceId) -> Result<(), StoreError> {
        self.tables()?
            .maintenance
            .remove(id.get(), "Maintenance record")?;
        Ok(())
    }

    async fn find_by_id(&self, id: MaintenanceId) -> Result<Option<Maintenance>, StoreError> {
        Ok(self.tables()?.maintenance.rows.get(&id.get()).cloned())
    }

    async fn list(&self, query: &MaintenanceQuery) -> Result<Vec<Maintenance>, StoreError> {
        let mut rows: Vec<Maintenance> = self
            .tables()?
            .maintenance
            .rows
            .values()
            .filter(|record| approval_matches(record, query.approval))
            .cloned()
            .collect();
        match query.order {
            MaintenanceOrder::DateAsc => rows.sort_by(|a, b| {
                nulls_last(a.date.as_ref(), b.date.as_ref()).then(a.id.cmp(&b.id))
            }),
            MaintenanceOrder::DateDesc => rows.sort_by(|a, b| {
                nulls_last_desc(a.date.as_ref(), b.date.as_ref()).then(a.id.cmp(&b.id))
            }),
            MaintenanceOrder::ApprovedAtDesc => rows.sort_by(|a, b| {
                nulls_last_desc(approved_at(a).as_ref(), approved_at(b).as_ref())
                    .then(a.id.cmp(&b.id))
            }),
        }
        Ok(apply_limit(rows, query.limit))
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(count_of(self.tables()?.maintenance.rows.len()))
    }

    async fn total_cost(&self) -> Result<Money, StoreError> {
        Ok(self
            .tables()?
            .maintenance
            .rows
            .values()
            .fold(Money::ZERO, |total, record| total.saturating_add(record.cost)))
    }

    async fn approve(
        &self,
        id: MaintenanceId,
        approver: UserId,
        at: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, StoreError> {
        let mut tables = self.tables()?;
        let row = tables
            .maintenance
            .require_mut(id.get(), "Maintenance record")?;
        if !row.approval.is_pending() {
            return Ok(ApprovalOutcome::AlreadyApproved(row.clone()));
        }
        row.approval = Approval::Approved {
            by: Some(approver),
            at,
        };
        Ok(ApprovalOutcome::Approved(row.clone()))
    }
}
