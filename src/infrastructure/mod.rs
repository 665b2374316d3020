//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete storage backends and the outbound URL check.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-process repository implementations
//! - [`reachability`] - HTTP `HEAD` probe behind the `UrlValidator` trait

pub mod memory;
pub mod persistence;
pub mod reachability;
