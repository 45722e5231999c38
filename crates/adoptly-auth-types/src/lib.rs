//! Auth types for the Adoptly API.
//!
//! Provides JWT issue/validation, the session cookie builders, and the
//! `Authenticated` extractor.

pub mod cookie;
pub mod identity;
pub mod token;
