//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use crate::application::services::{KeyGenerator, LinkService, LinkSettings, RedirectResolver};
use crate::domain::clock::Clock;
use crate::domain::repositories::{ShortLinkRepository, UserRepository};
use crate::domain::url_validator::UrlValidator;

/// Link service over whichever storage backend is configured.
pub type DynLinkService = LinkService<dyn ShortLinkRepository, dyn UserRepository>;

/// Redirect resolver over whichever storage backend is configured.
pub type DynRedirectResolver = RedirectResolver<dyn ShortLinkRepository>;

/// Application state cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub redirect_resolver: Arc<DynRedirectResolver>,
    /// Page size used when a list request does not specify one.
    pub default_page_size: u32,
}

/// Collaborators needed to assemble an [`AppState`].
pub struct StateDeps {
    pub link_repository: Arc<dyn ShortLinkRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub key_generator: Arc<KeyGenerator>,
    pub clock: Arc<dyn Clock>,
    pub url_validator: Option<Arc<dyn UrlValidator>>,
}

impl AppState {
    /// Wires services on top of the given repositories.
    pub fn new(deps: StateDeps, settings: LinkSettings, default_page_size: u32) -> Self {
        let mut link_service = LinkService::new(
            deps.link_repository.clone(),
            deps.user_repository,
            deps.key_generator,
            deps.clock.clone(),
            settings,
        );

        if let Some(url_validator) = deps.url_validator {
            link_service = link_service.with_url_validator(url_validator);
        }

        let redirect_resolver = RedirectResolver::new(deps.link_repository, deps.clock);

        Self {
            link_service: Arc::new(link_service),
            redirect_resolver: Arc::new(redirect_resolver),
            default_page_size,
        }
    }
}
