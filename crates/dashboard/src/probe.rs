//! Server availability probing.

use std::time::Duration;

/// Fixed probe timeout. A server that cannot answer a health check within
/// this window is treated as unreachable for the current operation.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// A reachability signal for the remote API.
///
/// `probe` collapses every failure mode (network error, timeout, non-2xx)
/// into `false`; it never returns an error. The result is valid only for
/// the operation about to run — callers re-probe rather than cache it.
pub trait Probe {
    fn probe(&self) -> impl Future<Output = bool>;
}

/// Probes `GET {base_url}/health`.
#[derive(Debug, Clone)]
pub struct HealthProber {
    client: reqwest::Client,
    url: String,
}

impl HealthProber {
    /// Create a prober for the API rooted at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/health", base_url.trim_end_matches('/')),
        }
    }
}

impl Probe for HealthProber {
    async fn probe(&self) -> bool {
        match self
            .client
            .get(&self.url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    tracing::debug!(status = %response.status(), "health probe rejected");
                }
                ok
            }
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_probes_false() {
        // Reserved TEST-NET-1 address; nothing answers here.
        let prober = HealthProber::new("http://192.0.2.1:1");
        assert!(!prober.probe().await);
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let prober = HealthProber::new("http://localhost:5000/");
        assert_eq!(prober.url, "http://localhost:5000/health");
    }
}
