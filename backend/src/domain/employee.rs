//! Employees: the people assets and licences are assigned to.

use serde::{Deserialize, Serialize};

use super::fields::{optional_text, required_text};
use super::{EmployeeId, Error};

/// Persisted employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Identifier.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Department, if recorded.
    pub department: Option<String>,
    /// Free-text contact; expected to be an email address but not validated.
    pub contact: Option<String>,
}

/// Raw employee form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    /// Required name.
    #[serde(default)]
    pub name: String,
    /// Optional department.
    pub department: Option<String>,
    /// Optional contact.
    pub contact: Option<String>,
}

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDraft {
    /// Trimmed, non-empty name.
    pub name: String,
    /// Trimmed department.
    pub department: Option<String>,
    /// Trimmed contact.
    pub contact: Option<String>,
}

impl TryFrom<EmployeeInput> for EmployeeDraft {
    type Error = Error;

    fn try_from(input: EmployeeInput) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text(&input.name, "Employee name is required")?,
            department: optional_text(input.department.as_deref()),
            contact: optional_text(input.contact.as_deref()),
        })
    }
}

impl EmployeeDraft {
    /// Materialise the draft under `id`.
    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name,
            department: self.department,
            contact: self.contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let input = EmployeeInput {
            name: "  ".into(),
            ..EmployeeInput::default()
        };
        let err = EmployeeDraft::try_from(input).expect_err("name required");
        assert_eq!(err.message(), "Employee name is required");
    }

    #[test]
    fn contact_is_kept_verbatim_apart_from_trimming() {
        let input = EmployeeInput {
            name: "Ama".into(),
            department: Some("".into()),
            contact: Some(" ext. 4412 ".into()),
        };
        let draft = EmployeeDraft::try_from(input).expect("valid draft");
        assert_eq!(draft.department, None);
        assert_eq!(draft.contact.as_deref(), Some("ext. 4412"));
    }
}
