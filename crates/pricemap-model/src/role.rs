//! Semantic column roles.
//!
//! A [`Role`] is the meaning a source column carries in a supplier file:
//! the article code, the brand, the price, and so on. The set is closed;
//! every role except [`Role::Undefined`] has catalog entries describing how
//! its values and headers look.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic category assigned to a column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Supplier or manufacturer catalog code.
    Article,
    /// Manufacturer or trade mark.
    Brand,
    /// Human readable product name.
    Name,
    /// Unit price.
    Price,
    /// Stock or order quantity.
    Quantity,
    /// Product group.
    Category,
    /// Long free-text description.
    Description,
    /// Unit of measure (шт, кг, ...).
    Unit,
    /// No role could be established, or the column lost a tie-break.
    #[default]
    Undefined,
}

impl Role {
    /// All roles a column can be assigned, in catalog order.
    pub const ASSIGNABLE: [Role; 8] = [
        Role::Brand,
        Role::Article,
        Role::Name,
        Role::Price,
        Role::Quantity,
        Role::Category,
        Role::Description,
        Role::Unit,
    ];

    /// Returns the lower-case identifier used in configuration files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Article => "article",
            Role::Brand => "brand",
            Role::Name => "name",
            Role::Price => "price",
            Role::Quantity => "quantity",
            Role::Category => "category",
            Role::Description => "description",
            Role::Unit => "unit",
            Role::Undefined => "undefined",
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, Role::Undefined)
    }

    /// Returns true for roles whose values are expected to be numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Role::Price | Role::Quantity)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses a role name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(Role::Article),
            "brand" => Ok(Role::Brand),
            "name" => Ok(Role::Name),
            "price" => Ok(Role::Price),
            "quantity" | "qty" => Ok(Role::Quantity),
            "category" => Ok(Role::Category),
            "description" => Ok(Role::Description),
            "unit" => Ok(Role::Unit),
            "undefined" => Ok(Role::Undefined),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
