//! Domain layer containing business entities and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`short_key`] - Short key alphabet and length
//! - [`page`] - Pagination request and result types
//! - [`clock`] - Injectable time source
//! - [`url_validator`] - Optional reachability check for original URLs
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Business rules live in services (see [`crate::application::services`])

pub mod clock;
pub mod entities;
pub mod page;
pub mod repositories;
pub mod short_key;
pub mod url_validator;
