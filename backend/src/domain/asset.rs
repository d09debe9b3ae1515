//! Hardware assets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fields::{optional_date, optional_text, required_text};
use super::{AssetId, EmployeeId, Error};

/// Mutable attributes of an asset. The tag is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    /// Category, e.g. "Laptop".
    pub asset_type: Option<String>,
    /// Manufacturer.
    pub brand: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Manufacturer serial number.
    pub serial_no: Option<String>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Warranty end date; drives warranty notifications.
    pub warranty_expiry: Option<NaiveDate>,
    /// Free-form status, e.g. "In Use" or "Repair".
    pub status: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Assignee.
    pub assigned_to: Option<EmployeeId>,
}

/// Persisted asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Surrogate identifier.
    pub id: AssetId,
    /// Externally visible, unique tag.
    pub asset_tag: String,
    /// Everything else.
    #[serde(flatten)]
    pub details: AssetDetails,
}

/// Raw asset form, shared by create and edit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    /// Tag; read on create, ignored on edit.
    pub asset_tag: Option<String>,
    /// See [`AssetDetails::asset_type`].
    pub asset_type: Option<String>,
    /// See [`AssetDetails::brand`].
    pub brand: Option<String>,
    /// See [`AssetDetails::model`].
    pub model: Option<String>,
    /// See [`AssetDetails::serial_no`].
    pub serial_no: Option<String>,
    /// `YYYY-MM-DD` or blank.
    pub purchase_date: Option<String>,
    /// `YYYY-MM-DD` or blank.
    pub warranty_expiry: Option<String>,
    /// See [`AssetDetails::status`].
    pub status: Option<String>,
    /// See [`AssetDetails::notes`].
    pub notes: Option<String>,
    /// Employee id or absent.
    pub assigned_to: Option<i32>,
}

impl AssetInput {
    /// Validate the mutable attributes.
    pub fn details(&self) -> Result<AssetDetails, Error> {
        Ok(AssetDetails {
            asset_type: optional_text(self.asset_type.as_deref()),
            brand: optional_text(self.brand.as_deref()),
            model: optional_text(self.model.as_deref()),
            serial_no: optional_text(self.serial_no.as_deref()),
            purchase_date: optional_date("purchase_date", self.purchase_date.as_deref())?,
            warranty_expiry: optional_date("warranty_expiry", self.warranty_expiry.as_deref())?,
            status: optional_text(self.status.as_deref()),
            notes: optional_text(self.notes.as_deref()),
            assigned_to: self.assigned_to.map(EmployeeId::new),
        })
    }

    /// Validate a create request; the tag is mandatory.
    pub fn into_new_asset(self) -> Result<NewAsset, Error> {
        let details = self.details()?;
        let asset_tag = required_text(
            self.asset_tag.as_deref().unwrap_or_default(),
            "Asset ID is required",
        )?;
        Ok(NewAsset { asset_tag, details })
    }
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    /// Unique tag.
    pub asset_tag: String,
    /// Attributes.
    pub details: AssetDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_tag() {
        let err = AssetInput::default()
            .into_new_asset()
            .expect_err("tag required");
        assert_eq!(err.message(), "Asset ID is required");
    }

    #[test]
    fn blank_dates_and_text_become_none() {
        let input = AssetInput {
            asset_tag: Some(" LAP-001 ".into()),
            brand: Some("".into()),
            purchase_date: Some("".into()),
            warranty_expiry: Some("2026-03-01".into()),
            assigned_to: Some(4),
            ..AssetInput::default()
        };
        let asset = input.into_new_asset().expect("valid asset");
        assert_eq!(asset.asset_tag, "LAP-001");
        assert_eq!(asset.details.brand, None);
        assert_eq!(asset.details.purchase_date, None);
        assert_eq!(
            asset.details.warranty_expiry,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(asset.details.assigned_to, Some(EmployeeId::new(4)));
    }

    #[test]
    fn malformed_warranty_date_is_rejected() {
        let input = AssetInput {
            warranty_expiry: Some("03/01/2026".into()),
            ..AssetInput::default()
        };
        assert!(input.details().is_err());
    }
}
