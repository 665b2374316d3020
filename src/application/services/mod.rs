//! Business logic services for the application layer.

pub mod key_generator;
pub mod link_service;
pub mod redirect_resolver;

pub use key_generator::KeyGenerator;
pub use link_service::{CreateShortLink, LinkService, LinkSettings};
pub use redirect_resolver::RedirectResolver;
