//! Tabular exports of the four inventory entities.
//!
//! Every export is a fixed header row followed by one row per record, with
//! nulls as empty strings, dates as `YYYY-MM-DD` and costs with two decimal
//! places. Encoding into CSV or XLSX happens behind [`TableEncoder`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::fields::format_optional_date;
use crate::domain::ports::TableEncoder;
use crate::domain::{Asset, Employee, Error, Maintenance, SoftwareLicense};

/// Message returned when no spreadsheet encoder is compiled in.
pub const SPREADSHEET_UNAVAILABLE: &str = "Spreadsheet export is not available";

/// Exportable inventory entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportEntity {
    Assets,
    Employees,
    Maintenance,
    Licenses,
}

impl ExportEntity {
    /// Path segment and file stem, e.g. `assets`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Employees => "employees",
            Self::Maintenance => "maintenance",
            Self::Licenses => "licenses",
        }
    }

    /// Fixed header row.
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Assets => &[
                "Asset ID",
                "Type",
                "Brand",
                "Model",
                "Serial No",
                "Purchase Date",
                "Warranty Expiry",
                "Status",
                "Assigned To",
            ],
            Self::Employees => &["ID", "Name", "Department", "Contact"],
            Self::Maintenance => &["ID", "Asset ID", "Date", "Description", "Cost"],
            Self::Licenses => &["ID", "Software Name", "License Key", "Expiry Date", "Assigned To"],
        }
    }
}

impl fmt::Display for ExportEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportEntity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assets" => Ok(Self::Assets),
            "employees" => Ok(Self::Employees),
            "maintenance" => Ok(Self::Maintenance),
            "licenses" => Ok(Self::Licenses),
            _ => Err(Error::not_found("not found")),
        }
    }
}

/// Requested file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "excel" => Ok(Self::Excel),
            _ => Err(Error::not_found("not found")),
        }
    }
}

/// Header plus rows, ready for an encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    entity: ExportEntity,
    rows: Vec<Vec<String>>,
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

fn id_text<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|id| id.to_string()).unwrap_or_default()
}

impl ExportTable {
    pub fn entity(&self) -> ExportEntity {
        self.entity
    }

    pub fn headers(&self) -> &'static [&'static str] {
        self.entity.headers()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Attachment file name for `extension`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.entity)
    }

    pub fn assets(assets: &[Asset]) -> Self {
        let rows = assets
            .iter()
            .map(|asset| {
                let details = &asset.details;
                vec![
                    asset.asset_tag.clone(),
                    text(details.asset_type.as_deref()),
                    text(details.brand.as_deref()),
                    text(details.model.as_deref()),
                    text(details.serial_no.as_deref()),
                    format_optional_date(details.purchase_date),
                    format_optional_date(details.warranty_expiry),
                    text(details.status.as_deref()),
                    id_text(details.assigned_to),
                ]
            })
            .collect();
        Self {
            entity: ExportEntity::Assets,
            rows,
        }
    }

    pub fn employees(employees: &[Employee]) -> Self {
        let rows = employees
            .iter()
            .map(|employee| {
                vec![
                    employee.id.to_string(),
                    employee.name.clone(),
                    text(employee.department.as_deref()),
                    text(employee.contact.as_deref()),
                ]
            })
            .collect();
        Self {
            entity: ExportEntity::Employees,
            rows,
        }
    }

    pub fn maintenance(records: &[Maintenance]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                vec![
                    record.id.to_string(),
                    id_text(record.asset_id),
                    format_optional_date(record.date),
                    text(record.description.as_deref()),
                    record.cost.to_string(),
                ]
            })
            .collect();
        Self {
            entity: ExportEntity::Maintenance,
            rows,
        }
    }

    pub fn licenses(licenses: &[SoftwareLicense]) -> Self {
        let rows = licenses
            .iter()
            .map(|license| {
                vec![
                    license.id.to_string(),
                    license.software_name.clone(),
                    text(license.license_key.as_deref()),
                    format_optional_date(license.expiry_date),
                    id_text(license.assigned_to),
                ]
            })
            .collect();
        Self {
            entity: ExportEntity::Licenses,
            rows,
        }
    }
}

/// Whether XLSX export is compiled in.
#[derive(Clone)]
pub enum SpreadsheetCapability {
    Available(Arc<dyn TableEncoder>),
    Unavailable { reason: String },
}

impl SpreadsheetCapability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The encoder, or a `503` carrying [`SPREADSHEET_UNAVAILABLE`].
    pub fn encoder(&self) -> Result<Arc<dyn TableEncoder>, Error> {
        match self {
            Self::Available(encoder) => Ok(Arc::clone(encoder)),
            Self::Unavailable { reason } => {
                tracing::warn!(reason = %reason, "spreadsheet export requested but unavailable");
                Err(Error::service_unavailable(SPREADSHEET_UNAVAILABLE))
            }
        }
    }
}

impl fmt::Debug for SpreadsheetCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(encoder) => f
                .debug_tuple("SpreadsheetCapability::Available")
                .field(&encoder.content_type())
                .finish(),
            Self::Unavailable { reason } => f
                .debug_struct("SpreadsheetCapability::Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Approval, AssetDetails, AssetId, EmployeeId, ErrorCode, LicenseId, MaintenanceId, Money,
    };
    use chrono::NaiveDate;
    use rstest::rstest;

    #[test]
    fn asset_rows_use_tag_and_blank_nulls() {
        let asset = Asset {
            id: AssetId::new(3),
            asset_tag: "LAP-003".into(),
            details: AssetDetails {
                brand: Some("Lenovo".into()),
                warranty_expiry: NaiveDate::from_ymd_opt(2026, 1, 9),
                assigned_to: Some(EmployeeId::new(2)),
                ..AssetDetails::default()
            },
        };

        let table = ExportTable::assets(&[asset]);

        assert_eq!(table.headers().len(), 9);
        assert_eq!(
            table.rows()[0],
            vec!["LAP-003", "", "Lenovo", "", "", "", "2026-01-09", "", "2"]
        );
    }

    #[test]
    fn maintenance_cost_has_two_decimals() {
        let record = Maintenance {
            id: MaintenanceId::new(8),
            asset_id: None,
            date: None,
            description: Some("Fan".into()),
            cost: Money::from_cents(1250).expect("non-negative"),
            approval: Approval::Pending,
        };

        let table = ExportTable::maintenance(&[record]);

        assert_eq!(table.rows()[0], vec!["8", "", "", "Fan", "12.50"]);
        assert_eq!(table.file_name("csv"), "maintenance.csv");
    }

    #[test]
    fn one_row_per_license() {
        let licenses: Vec<SoftwareLicense> = (1..=3)
            .map(|id| SoftwareLicense {
                id: LicenseId::new(id),
                software_name: format!("Tool {id}"),
                license_key: None,
                expiry_date: None,
                assigned_to: None,
            })
            .collect();

        let table = ExportTable::licenses(&licenses);

        assert_eq!(table.rows().len(), 3);
        assert!(table.rows().iter().all(|row| row[3].is_empty()));
    }

    #[rstest]
    #[case("assets", ExportEntity::Assets)]
    #[case("employees", ExportEntity::Employees)]
    #[case("maintenance", ExportEntity::Maintenance)]
    #[case("licenses", ExportEntity::Licenses)]
    fn parses_entity_segments(#[case] raw: &str, #[case] expected: ExportEntity) {
        assert_eq!(raw.parse::<ExportEntity>().expect("known entity"), expected);
    }

    #[test]
    fn unknown_format_is_not_found() {
        let err = "pdf".parse::<ExportFormat>().expect_err("unknown format");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn unavailable_spreadsheet_maps_to_503() {
        let Err(err) = SpreadsheetCapability::unavailable("xlsx feature disabled").encoder() else {
            panic!("unavailable capability yielded an encoder");
        };
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(err.message(), SPREADSHEET_UNAVAILABLE);
    }
}
