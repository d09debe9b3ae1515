//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live here so
//! every repository reads rows the same way.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::warn;

use super::schema::{assets, employees, maintenance, software_licenses, users};
use crate::domain::{
    Approval, Asset, AssetDetails, AssetId, Employee, EmployeeDraft, EmployeeId, LicenseDraft,
    LicenseId, Maintenance, MaintenanceDraft, MaintenanceId, Money, NewAsset, NewUser,
    PasswordHash, Role, SoftwareLicense, User, UserId,
};

pub(crate) const STATUS_PENDING: &str = "Pending";
pub(crate) const STATUS_APPROVED: &str = "Approved";

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = row.role.parse().unwrap_or_else(|_| {
            warn!(
                value = %row.role,
                user_id = row.id,
                "unrecognised role value, defaulting to Employee"
            );
            Role::Employee
        });
        Self::new(
            UserId::new(row.id),
            row.username,
            row.email,
            PasswordHash::new(row.password_hash),
            role,
        )
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            username: &user.username,
            email: &user.email,
            password_hash: user.password_hash.as_str(),
            role: user.role.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmployeeRow {
    pub id: i32,
    pub name: String,
    pub department: Option<String>,
    pub contact: Option<String>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId::new(row.id),
            name: row.name,
            department: row.department,
            contact: row.contact,
        }
    }
}

/// Insert and update payload; `None` clears the column.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = employees)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EmployeeChanges<'a> {
    pub name: &'a str,
    pub department: Option<&'a str>,
    pub contact: Option<&'a str>,
}

impl<'a> From<&'a EmployeeDraft> for EmployeeChanges<'a> {
    fn from(draft: &'a EmployeeDraft) -> Self {
        Self {
            name: &draft.name,
            department: draft.department.as_deref(),
            contact: draft.contact.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssetRow {
    pub id: i32,
    pub asset_tag: String,
    pub asset_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_no: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub assigned_to: Option<i32>,
}

impl From<AssetRow> for Asset {
    fn from(row: AssetRow) -> Self {
        Self {
            id: AssetId::new(row.id),
            asset_tag: row.asset_tag,
            details: AssetDetails {
                asset_type: row.asset_type,
                brand: row.brand,
                model: row.model,
                serial_no: row.serial_no,
                purchase_date: row.purchase_date,
                warranty_expiry: row.warranty_expiry,
                status: row.status,
                notes: row.notes,
                assigned_to: row.assigned_to.map(EmployeeId::new),
            },
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = assets)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AssetChanges<'a> {
    pub asset_type: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub model: Option<&'a str>,
    pub serial_no: Option<&'a str>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub status: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub assigned_to: Option<i32>,
}

impl<'a> From<&'a AssetDetails> for AssetChanges<'a> {
    fn from(details: &'a AssetDetails) -> Self {
        Self {
            asset_type: details.asset_type.as_deref(),
            brand: details.brand.as_deref(),
            model: details.model.as_deref(),
            serial_no: details.serial_no.as_deref(),
            purchase_date: details.purchase_date,
            warranty_expiry: details.warranty_expiry,
            status: details.status.as_deref(),
            notes: details.notes.as_deref(),
            assigned_to: details.assigned_to.map(EmployeeId::get),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assets)]
pub(crate) struct NewAssetRow<'a> {
    pub asset_tag: &'a str,
    #[diesel(embed)]
    pub details: AssetChanges<'a>,
}

impl<'a> From<&'a NewAsset> for NewAssetRow<'a> {
    fn from(asset: &'a NewAsset) -> Self {
        Self {
            asset_tag: &asset.asset_tag,
            details: AssetChanges::from(&asset.details),
        }
    }
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = maintenance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MaintenanceRow {
    pub id: i32,
    pub asset_id: Option<i32>,
    pub service_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub cost_cents: i64,
    pub status: String,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl From<MaintenanceRow> for Maintenance {
    fn from(row: MaintenanceRow) -> Self {
        let approval = match (row.status.as_str(), row.approved_at) {
            (STATUS_APPROVED, Some(at)) => Approval::Approved {
                by: row.approved_by.map(UserId::new),
                at,
            },
            (STATUS_PENDING, _) => Approval::Pending,
            (other, _) => {
                warn!(
                    value = other,
                    maintenance_id = row.id,
                    "inconsistent approval columns, treating record as pending"
                );
                Approval::Pending
            }
        };
        let cost = Money::from_cents(row.cost_cents).unwrap_or_else(|| {
            warn!(maintenance_id = row.id, "negative cost in store, reading as zero");
            Money::ZERO
        });
        Self {
            id: MaintenanceId::new(row.id),
            asset_id: row.asset_id.map(AssetId::new),
            date: row.service_date,
            description: row.description,
            cost,
            approval,
        }
    }
}

/// Insert and update payload; approval columns are never part of it.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = maintenance)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MaintenanceChanges<'a> {
    pub asset_id: Option<i32>,
    pub service_date: Option<NaiveDate>,
    pub description: Option<&'a str>,
    pub cost_cents: i64,
}

impl<'a> From<&'a MaintenanceDraft> for MaintenanceChanges<'a> {
    fn from(draft: &'a MaintenanceDraft) -> Self {
        Self {
            asset_id: draft.asset_id.map(AssetId::get),
            service_date: draft.date,
            description: draft.description.as_deref(),
            cost_cents: draft.cost.cents(),
        }
    }
}

// ---------------------------------------------------------------------------
// Software licences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = software_licenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LicenseRow {
    pub id: i32,
    pub software_name: String,
    pub license_key: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub assigned_to: Option<i32>,
}

impl From<LicenseRow> for SoftwareLicense {
    fn from(row: LicenseRow) -> Self {
        Self {
            id: LicenseId::new(row.id),
            software_name: row.software_name,
            license_key: row.license_key,
            expiry_date: row.expiry_date,
            assigned_to: row.assigned_to.map(EmployeeId::new),
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = software_licenses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct LicenseChanges<'a> {
    pub software_name: &'a str,
    pub license_key: Option<&'a str>,
    pub expiry_date: Option<NaiveDate>,
    pub assigned_to: Option<i32>,
}

impl<'a> From<&'a LicenseDraft> for LicenseChanges<'a> {
    fn from(draft: &'a LicenseDraft) -> Self {
        Self {
            software_name: &draft.software_name,
            license_key: draft.license_key.as_deref(),
            expiry_date: draft.expiry_date,
            assigned_to: draft.assigned_to.map(EmployeeId::get),
        }
    }
}
