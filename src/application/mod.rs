//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! key generation, clock reads and access rules. Services consume repository
//! traits and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::key_generator::KeyGenerator`] - Random short keys with collision avoidance
//! - [`services::link_service::LinkService`] - Short link creation, listing and deletion
//! - [`services::redirect_resolver::RedirectResolver`] - Expiry and privacy checks with click counting

pub mod services;
