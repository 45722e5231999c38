//! Test utilities for the Adoptly service.
//!
//! Import from tests only, never from production code.

pub mod auth;
