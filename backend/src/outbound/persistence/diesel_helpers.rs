//! Shared error mapping for the Diesel repositories.
//!
//! Every adapter reports failures through [`StoreError`]; constraint
//! violations are recognised by constraint name so the messages match the
//! in-memory store.

use tracing::{debug, warn};

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool errors to a store connection error.
pub fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors to store errors.
pub fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => {
                StoreError::duplicate(duplicate_message(info.constraint_name()))
            }
            DatabaseErrorKind::ForeignKeyViolation => StoreError::missing_reference(
                missing_reference_message(info.constraint_name(), info.details()),
            ),
            DatabaseErrorKind::ClosedConnection => {
                StoreError::connection("database connection error")
            }
            _ => StoreError::query("database error"),
        },
        _ => StoreError::query("database error"),
    }
}

fn duplicate_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.starts_with("users_") => "User already exists",
        Some("assets_asset_tag_key") => "Asset ID already exists",
        other => {
            warn!(constraint = ?other, "unrecognised unique violation");
            "Record already exists"
        }
    }
}

/// Build "<Entity> <id> does not exist" from a foreign key violation.
///
/// PostgreSQL reports the offending value in the detail line as
/// `Key (assigned_to)=(42) is not present in table "employees".`
fn missing_reference_message(constraint: Option<&str>, details: Option<&str>) -> String {
    let entity = match constraint {
        Some(name) if name.ends_with("assigned_to_fkey") => "Employee",
        Some("maintenance_asset_id_fkey") => "Asset",
        Some("maintenance_approved_by_fkey") => "User",
        other => {
            warn!(
                constraint = ?other,
                "unrecognised foreign key violation - may need specific error mapping"
            );
            return "Referenced record does not exist".to_owned();
        }
    };
    match details.and_then(offending_key) {
        Some(key) => format!("{entity} {key} does not exist"),
        None => format!("{entity} does not exist"),
    }
}

fn offending_key(details: &str) -> Option<&str> {
    let (_, rest) = details.split_once(")=(")?;
    let (key, _) = rest.split_once(')')?;
    Some(key)
}
