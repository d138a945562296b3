//! HTTP transport and the shared async runtime.
//!
//! Pipeline stages are written against the [`Transport`] trait so they can
//! run over a real reqwest client or an in-memory fake. Synchronous callers
//! drive async stages through [`SHARED_RUNTIME`].

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::SourceError;

/// User agent sent with every request unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = "curl/7.72.0";

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Client settings shared by every request of a run
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Whole-request timeout. `None` waits as long as the server takes.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// Something that can GET a URL and hand back the body.
pub trait Transport: Send + Sync + 'static {
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, SourceError>> + Send;
}

/// reqwest-backed transport with a single pooled client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(32);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::from_reqwest(url, e))?;
        response
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_timeout() {
        let config = HttpConfig::default();
        assert_eq!(config.user_agent, "curl/7.72.0");
        assert!(config.timeout.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn transport_builds_with_timeout() {
        let config = HttpConfig {
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[test]
    fn unreachable_host_is_fetch_error() {
        let transport = HttpTransport::new(&HttpConfig {
            connect_timeout: Duration::from_millis(200),
            ..Default::default()
        })
        .unwrap();
        // Port 9 on localhost is discard; nothing should be listening.
        let result = SHARED_RUNTIME
            .handle()
            .block_on(transport.get_text("http://127.0.0.1:9/users/alice"));
        let err = result.unwrap_err();
        assert!(err.is_fetch());
        assert!(format!("{err}").contains("127.0.0.1:9"));
    }
}
