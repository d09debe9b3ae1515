//! Software licences.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fields::{optional_date, optional_text, required_text};
use super::{EmployeeId, Error, LicenseId};

/// Persisted licence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareLicense {
    /// Identifier.
    pub id: LicenseId,
    /// Product name.
    pub software_name: String,
    /// Key or seat reference.
    pub license_key: Option<String>,
    /// Expiry date; drives licence notifications.
    pub expiry_date: Option<NaiveDate>,
    /// Assignee.
    pub assigned_to: Option<EmployeeId>,
}

/// Raw licence form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInput {
    /// Required product name.
    #[serde(default)]
    pub software_name: String,
    /// Optional key.
    pub license_key: Option<String>,
    /// `YYYY-MM-DD` or blank.
    pub expiry_date: Option<String>,
    /// Employee id or absent.
    pub assigned_to: Option<i32>,
}

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseDraft {
    /// Trimmed, non-empty product name.
    pub software_name: String,
    /// Trimmed key.
    pub license_key: Option<String>,
    /// Expiry.
    pub expiry_date: Option<NaiveDate>,
    /// Assignee.
    pub assigned_to: Option<EmployeeId>,
}

impl TryFrom<LicenseInput> for LicenseDraft {
    type Error = Error;

    fn try_from(input: LicenseInput) -> Result<Self, Self::Error> {
        Ok(Self {
            software_name: required_text(&input.software_name, "Software name is required")?,
            license_key: optional_text(input.license_key.as_deref()),
            expiry_date: optional_date("expiry_date", input.expiry_date.as_deref())?,
            assigned_to: input.assigned_to.map(EmployeeId::new),
        })
    }
}

impl LicenseDraft {
    /// Materialise the draft under `id`.
    pub fn into_license(self, id: LicenseId) -> SoftwareLicense {
        SoftwareLicense {
            id,
            software_name: self.software_name,
            license_key: self.license_key,
            expiry_date: self.expiry_date,
            assigned_to: self.assigned_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn software_name_is_required() {
        let err = LicenseDraft::try_from(LicenseInput::default()).expect_err("name required");
        assert_eq!(err.message(), "Software name is required");
    }

    #[test]
    fn parses_expiry_and_assignee() {
        let draft = LicenseDraft::try_from(LicenseInput {
            software_name: "Office".into(),
            license_key: Some("  ".into()),
            expiry_date: Some("2025-12-31".into()),
            assigned_to: Some(9),
        })
        .expect("valid draft");
        assert_eq!(draft.license_key, None);
        assert_eq!(draft.expiry_date, NaiveDate::from_ymd_opt(2025, 12, 31));
        assert_eq!(draft.assigned_to, Some(EmployeeId::new(9)));
    }
}
