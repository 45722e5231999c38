//! Shared plumbing for the Adoptly service: tracing, health probes,
//! request ids, env config helpers, and small sea-orm/serde extensions.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
