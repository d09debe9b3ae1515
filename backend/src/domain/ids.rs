//! Integer identifiers for persisted records.
//!
//! Each table uses a serial primary key; the newtypes stop an asset id being
//! passed where an employee id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database identifier.
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Raw identifier value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_record_id! {
    /// Identifier of a login account.
    UserId
}

define_record_id! {
    /// Identifier of an employee (asset and licence assignee).
    EmployeeId
}

define_record_id! {
    /// Surrogate identifier of an asset row; distinct from the asset tag.
    AssetId
}

define_record_id! {
    /// Identifier of a maintenance record.
    MaintenanceId
}

define_record_id! {
    /// Identifier of a software licence.
    LicenseId
}
