//! sea-orm entities for the Adoptly database.
//!
//! Enum-valued columns (`profile_type`, `species`, `status`, ...) are stored
//! as their lowercase wire names; conversion to `adoptly-domain` types
//! happens in the service's infra layer.

pub mod applications;
pub mod pets;
pub mod users;
