//! HTTP fetcher implementation
//!
//! Two fetch classes live here:
//! - a plain single-attempt fetch whose failures all degrade to empty text,
//!   used by the download workers;
//! - a permit-limited retrying fetch for discussion pages, which the root
//!   host serves grudgingly and throttles under load.

use reqwest::Client;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Classified cause of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    InvalidUrl,
    Decode,
    Other,
}

impl FailureKind {
    fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else if error.is_builder() || error.is_request() {
            Self::InvalidUrl
        } else if error.is_decode() {
            Self::Decode
        } else {
            Self::Other
        }
    }
}

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx response with its body text
    Success { body: String },

    /// Well-formed response with a non-success status
    HttpError { status: u16 },

    /// Transport-level failure (timeout, connect, decode, bad URL)
    Failed { kind: FailureKind, error: String },
}

/// Builds the shared HTTP client
///
/// One client is built at startup with the configured per-request timeout
/// and reused for every fetch in the process.
pub fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("magpie/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues one GET and classifies the result
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                return FetchOutcome::HttpError {
                    status: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Success { body },
                Err(e) => FetchOutcome::Failed {
                    kind: FailureKind::classify(&e),
                    error: e.to_string(),
                },
            }
        }
        Err(e) => FetchOutcome::Failed {
            kind: FailureKind::classify(&e),
            error: e.to_string(),
        },
    }
}

/// Fetches a page, degrading every failure to empty text
///
/// Workers and the frontier treat "no data" uniformly: any HTTP or
/// transport failure is logged and surfaces as an empty string, to be
/// retried implicitly on a later cycle.
pub async fn fetch_text(client: &Client, url: &str) -> String {
    match fetch_page(client, url).await {
        FetchOutcome::Success { body } => body,
        FetchOutcome::HttpError { status } => {
            tracing::warn!("HTTP {} fetching {}", status, url);
            String::new()
        }
        FetchOutcome::Failed { kind, error } => {
            tracing::warn!("{:?} error fetching {}: {}", kind, url, error);
            String::new()
        }
    }
}

/// Fetches a discussion page with bounded retries under a permit pool
///
/// One permit is held per HTTP attempt and released before the backoff
/// sleep, so a retrying task never starves other stories of the pool. The
/// caller's `reject` predicate classifies a successful-but-invalid body
/// (a throttle page, say) as a soft failure. Exactly `retries` attempts are
/// made; exhaustion returns empty text rather than an error.
pub async fn fetch_with_retry(
    client: &Client,
    permits: &Semaphore,
    url: &str,
    retries: u32,
    reject: impl Fn(&str) -> bool,
) -> String {
    for attempt in 1..=retries {
        let body = {
            let _permit = match permits.acquire().await {
                Ok(permit) => permit,
                Err(_) => return String::new(), // pool closed, shutting down
            };
            fetch_text(client, url).await
        };

        if !body.is_empty() && !reject(&body) {
            return body;
        }

        tracing::info!(
            "Attempt {}/{} for {} yielded no usable body",
            attempt,
            retries,
            url
        );

        if attempt < retries {
            tokio::time::sleep(backoff_delay(attempt)).await;
        }
    }

    String::new()
}

/// Randomized backoff: base jitter plus a term growing linearly with the
/// attempt number
fn backoff_delay(attempt: u32) -> Duration {
    let jitter_ms = fastrand::u64(100..600);
    Duration::from_millis(jitter_ms + u64::from(attempt) * 500)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(5).is_ok());
    }

    #[test]
    fn test_backoff_grows_with_attempt() {
        let early = backoff_delay(1);
        let late = backoff_delay(3);
        assert!(early >= Duration::from_millis(600));
        assert!(early < Duration::from_millis(1100));
        assert!(late >= Duration::from_millis(1600));
        assert!(late < Duration::from_millis(2100));
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let outcome = fetch_page(&client, &format!("{}/page", server.uri())).await;
        assert!(matches!(outcome, FetchOutcome::Success { body } if body == "hello"));
    }

    #[tokio::test]
    async fn test_fetch_page_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let outcome = fetch_page(&client, &format!("{}/gone", server.uri())).await;
        assert!(matches!(outcome, FetchOutcome::HttpError { status: 404 }));
    }

    #[tokio::test]
    async fn test_fetch_text_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        assert_eq!(fetch_text(&client, &format!("{}/gone", server.uri())).await, "");

        // Unreachable port: transport failure also degrades to empty
        assert_eq!(fetch_text(&client, "http://127.0.0.1:1/").await, "");
    }

    #[tokio::test]
    async fn test_retry_bound_is_exact() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("throttled"))
            .expect(3)
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let permits = Arc::new(Semaphore::new(3));

        let body = fetch_with_retry(
            &client,
            &permits,
            &format!("{}/item", server.uri()),
            3,
            |body| body.contains("throttled"),
        )
        .await;

        assert_eq!(body, "");
        // Mock expectation of exactly 3 requests is verified on drop
    }

    #[tokio::test]
    async fn test_retry_returns_first_accepted_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/item"))
            .respond_with(ResponseTemplate::new(200).set_body_string("real content"))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let permits = Arc::new(Semaphore::new(1));

        let body = fetch_with_retry(
            &client,
            &permits,
            &format!("{}/item", server.uri()),
            3,
            |_| false,
        )
        .await;

        assert_eq!(body, "real content");
    }

    #[tokio::test]
    async fn test_retry_releases_permit_between_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("nope"))
            .mount(&server)
            .await;

        let client = build_http_client(5).unwrap();
        let permits = Arc::new(Semaphore::new(1));

        // With a single permit, a retrying fetch must not deadlock itself
        let body = fetch_with_retry(
            &client,
            &permits,
            &format!("{}/item", server.uri()),
            2,
            |_| true,
        )
        .await;

        assert_eq!(body, "");
        assert_eq!(permits.available_permits(), 1);
    }
}
