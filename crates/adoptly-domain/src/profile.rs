//! User profile role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Mutually exclusive marketplace role of a user.
///
/// Sellers list pets; adopters apply for them. A user may toggle between
/// the two at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Adopter,
    Seller,
}

impl ProfileType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adopter => "adopter",
            Self::Seller => "seller",
        }
    }

    /// The other role.
    pub fn toggled(self) -> Self {
        match self {
            Self::Adopter => Self::Seller,
            Self::Seller => Self::Adopter,
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; registration accepts `"Seller"` as well as `"seller"`.
impl FromStr for ProfileType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adopter" => Ok(Self::Adopter),
            "seller" => Ok(Self::Seller),
            _ => Err(UnknownVariant::new("profile type", s)),
        }
    }
}
