use serde::{Deserialize, Serialize};

/// Role value attached to a branch user.
///
/// The wire form is the uppercase role value stored in the role catalog
/// (`GUDANG`, `DRIVER`, ...). Values this core does not act on are kept
/// verbatim in `Other` so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Warehouse staff; approves outgoing transfers.
    Gudang,
    Driver,
    /// Cashier; receives incoming transfers and runs the till.
    Kasir,
    Admin,
    Owner,
    Other(String),
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "GUDANG" => Role::Gudang,
            "DRIVER" => Role::Driver,
            "KASIR" => Role::Kasir,
            "ADMIN" => Role::Admin,
            "OWNER" => Role::Owner,
            _ => Role::Other(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Gudang => "GUDANG",
            Role::Driver => "DRIVER",
            Role::Kasir => "KASIR",
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
            Role::Other(v) => v,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
