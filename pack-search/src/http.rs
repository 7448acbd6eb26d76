//! Shared HTTP client for catalog provider requests.
//!
//! Both public catalog APIs ask clients to identify themselves with a
//! descriptive User-Agent; the timeout doubles as the provider deadline.

use crate::config::SearchConfig;
use crate::error::SearchError;
use rand::Rng;
use std::time::Duration;

/// User-Agent sent when the configuration does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("packfinder/", env!("CARGO_PKG_VERSION"), " (pack-search)");

/// Build a [`reqwest::Client`] configured for catalog API requests.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Send a GET request and return the response body.
pub(crate) async fn get_body(
    client: &reqwest::Client,
    url: url::Url,
    provider: &str,
) -> Result<String, SearchError> {
    let body = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| SearchError::Http(format!("{provider} request failed: {e}")))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("{provider} HTTP error: {e}")))?
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("{provider} response read failed: {e}")))?;

    tracing::trace!(bytes = body.len(), provider, "response received");
    Ok(body)
}

/// Random polite delay within `range_ms`, inclusive. Zero for `(0, 0)`.
pub(crate) fn request_delay(range_ms: (u64, u64)) -> Duration {
    let (min, max) = range_ms;
    if max == 0 || min > max {
        return Duration::from_millis(min.min(max));
    }
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(min..=max))
}
