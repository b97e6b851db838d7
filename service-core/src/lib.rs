//! service-core: Shared infrastructure for the QPay relay.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

