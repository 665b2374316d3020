//! External check that an original URL actually answers.

use async_trait::async_trait;

/// Decides whether a URL is reachable before a link is created for it.
///
/// Implementations must not fail: an unreachable host, a timeout or an error
/// status all simply mean `false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlValidator: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}
