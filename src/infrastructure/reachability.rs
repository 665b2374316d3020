//! HTTP reachability check for original URLs.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use ureq::{Agent, Proxy};
use url::Url;

use crate::domain::url_validator::UrlValidator;

/// Probes a URL with an HTTP `HEAD` request.
///
/// A URL is reachable when it parses, uses `http` or `https`, and the server
/// answers (after redirects) with a status below 400. ureq is blocking, so
/// each probe runs on the blocking thread pool.
#[derive(Clone)]
pub struct HttpUrlValidator {
    agent: Agent,
}

impl HttpUrlValidator {
    /// Creates a validator that honours the `HTTP_PROXY` family of variables.
    pub fn new(timeout: Duration) -> Self {
        Self::build(timeout, Proxy::try_from_env())
    }

    /// Creates a validator that always connects directly.
    pub fn direct(timeout: Duration) -> Self {
        Self::build(timeout, None)
    }

    fn build(timeout: Duration, proxy: Option<Proxy>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .proxy(proxy)
            .build()
            .into();

        Self { agent }
    }

    fn probe(agent: &Agent, url: &str) -> bool {
        match agent.head(url).call() {
            Ok(response) => {
                let status = response.status();
                debug!(url, status = status.as_u16(), "URL probe answered");
                status.as_u16() < 400
            }
            Err(e) => {
                debug!(url, error = %e, "URL probe failed");
                false
            }
        }
    }
}

#[async_trait]
impl UrlValidator for HttpUrlValidator {
    async fn is_reachable(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        let agent = self.agent.clone();
        let url = parsed.to_string();

        match tokio::task::spawn_blocking(move || Self::probe(&agent, &url)).await {
            Ok(reachable) => reachable,
            Err(e) => {
                warn!(error = %e, "URL probe task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use tokio::net::TcpListener;

    fn validator() -> HttpUrlValidator {
        HttpUrlValidator::direct(Duration::from_secs(2))
    }

    async fn spawn_target() -> String {
        let app = Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_rejects_unparseable_url() {
        assert!(!validator().is_reachable("not a url").await);
    }

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        assert!(!validator().is_reachable("ftp://example.com/file").await);
        assert!(!validator().is_reachable("mailto:someone@example.com").await);
    }

    #[tokio::test]
    async fn test_success_status_is_reachable() {
        let base = spawn_target().await;

        assert!(validator().is_reachable(&format!("{base}/ok")).await);
    }

    #[tokio::test]
    async fn test_error_status_is_unreachable() {
        let base = spawn_target().await;

        assert!(!validator().is_reachable(&format!("{base}/missing")).await);
        assert!(!validator().is_reachable(&format!("{base}/broken")).await);
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(!validator().is_reachable(&format!("http://{addr}/")).await);
    }
}
