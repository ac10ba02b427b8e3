//! Typed UUID identifiers.
//!
//! One newtype per record kind so a branch id can never be passed where a
//! product id is expected. Serialized as the bare UUID string.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh time-ordered (v7) id.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Leading 8 hex digits, as shown to users in messages.
            pub fn short_ref(&self) -> String {
                let mut hex = self.0.simple().to_string();
                hex.truncate(8);
                hex
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        /// Blank or malformed input is a validation failure naming the id kind.
        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Err(DomainError::validation(concat!(stringify!($name), " is required")));
                }
                Uuid::parse_str(raw).map(Self).map_err(|e| {
                    DomainError::validation(format!(concat!(stringify!($name), ": {}"), e))
                })
            }
        }
    };
}

id_type!(
    /// Client company; owns branches, users and every record.
    TenantId
);
id_type!(UserId);
id_type!(
    /// Physical location of a tenant with its own stock.
    BranchId
);
id_type!(
    /// Catalog entry; belongs to exactly one branch.
    ProductId
);
id_type!(TransferId);
id_type!(TransactionId);
