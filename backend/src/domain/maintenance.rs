//! Maintenance records and their one-way approval.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{optional_date, optional_text};
use super::{AssetId, Error, MaintenanceId, Money, UserId};

/// Approval state of a maintenance record.
///
/// `Pending -> Approved` is the only transition. Approver and timestamp are
/// set together; the approver becomes `None` if that account is later
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum Approval {
    /// Awaiting an Admin.
    Pending,
    /// Approved once, never revisited.
    Approved {
        /// Approving Admin.
        #[serde(rename = "approvedBy")]
        by: Option<UserId>,
        /// When the approval was recorded.
        #[serde(rename = "approvedAt")]
        at: DateTime<Utc>,
    },
}

impl Approval {
    /// Stored status code.
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved { .. } => "Approved",
        }
    }

    /// Whether the record is still awaiting approval.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Persisted maintenance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    /// Identifier.
    pub id: MaintenanceId,
    /// Serviced asset.
    pub asset_id: Option<AssetId>,
    /// Service date.
    pub date: Option<NaiveDate>,
    /// Work description.
    pub description: Option<String>,
    /// Cost, zero when not supplied.
    pub cost: Money,
    /// Approval state.
    #[serde(flatten)]
    pub approval: Approval,
}

/// Raw maintenance form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceInput {
    /// Asset id or absent.
    pub asset_id: Option<i32>,
    /// `YYYY-MM-DD` or blank.
    pub date: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Decimal string such as `"12.50"`; blank means zero.
    pub cost: Option<String>,
}

/// Validated create/update payload. Approval is never part of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceDraft {
    /// Serviced asset.
    pub asset_id: Option<AssetId>,
    /// Service date.
    pub date: Option<NaiveDate>,
    /// Trimmed description.
    pub description: Option<String>,
    /// Parsed cost.
    pub cost: Money,
}

impl TryFrom<MaintenanceInput> for MaintenanceDraft {
    type Error = Error;

    fn try_from(input: MaintenanceInput) -> Result<Self, Self::Error> {
        let cost = Money::parse_optional(input.cost.as_deref())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(Self {
            asset_id: input.asset_id.map(AssetId::new),
            date: optional_date("date", input.date.as_deref())?,
            description: optional_text(input.description.as_deref()),
            cost,
        })
    }
}

/// Result of an approval attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The record moved from Pending to Approved.
    Approved(Maintenance),
    /// The record was already approved; nothing changed.
    AlreadyApproved(Maintenance),
}
