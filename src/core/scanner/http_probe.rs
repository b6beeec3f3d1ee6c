// src/core/scanner/http_probe.rs

use tracing::{debug, error, info};

use crate::core::error::ProbeError;
use crate::core::models::ProbeOutcome;
use std::net::IpAddr;
use std::time::Duration;

/// Builds the client shared by every HTTP probe of a run.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("connprobe/", env!("CARGO_PKG_VERSION")))
        .build()
        .inspect_err(|e| error!(error = %e, "Failed to build HTTP client."))
}

/// The URL fetched for a target: its root path over HTTPS. The port is left
/// implicit when it is the HTTPS default.
pub fn root_url(host: &str, port: u16) -> String {
    let authority = match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(addr)) => format!("[{}]", addr),
        _ => host.to_string(),
    };
    if port == 443 {
        format!("https://{}/", authority)
    } else {
        format!("https://{}:{}/", authority, port)
    }
}

/// Issues one GET for the root of `host:port` over HTTPS.
///
/// Any response counts as success, whatever its status: the probe asks whether
/// an HTTPS server answered, not whether the page is healthy.
pub async fn run_http_probe(
    client: &reqwest::Client,
    host: &str,
    port: u16,
    deadline: Duration,
) -> ProbeOutcome {
    let url = root_url(host, port);
    debug!(url = %url, "Sending HTTP GET.");

    match client.get(&url).timeout(deadline).send().await {
        Ok(response) => {
            info!(url = %url, status = %response.status(), "Received HTTP response.");
            drop(response);
            ProbeOutcome::Success
        }
        Err(e) if e.is_timeout() => {
            debug!(url = %url, "HTTP request timed out.");
            ProbeOutcome::failed(ProbeError::timeout(deadline))
        }
        Err(e) if e.is_builder() => ProbeOutcome::failed(ProbeError::MalformedTarget(e.to_string())),
        Err(e) => {
            debug!(url = %url, error = %e, "HTTP request failed.");
            ProbeOutcome::failed(ProbeError::Protocol(error_chain(&e)))
        }
    }
}

// reqwest's top-level message is just "error sending request"; the cause is further down.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_url_brackets_ipv6_literals() {
        assert_eq!(root_url("example.com", 443), "https://example.com/");
        assert_eq!(root_url("10.0.0.1", 8443), "https://10.0.0.1:8443/");
        assert_eq!(root_url("::1", 443), "https://[::1]/");
    }

    #[tokio::test]
    async fn closed_port_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = build_client().unwrap();
        let outcome = run_http_probe(&client, "127.0.0.1", port, Duration::from_secs(5)).await;
        assert!(matches!(outcome.cause(), Some(ProbeError::Protocol(_))));
    }

    #[tokio::test]
    async fn unresolvable_host_fails() {
        let client = build_client().unwrap();
        let outcome = run_http_probe(&client, "host.invalid", 443, Duration::from_secs(5)).await;
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    #[ignore]
    async fn public_https_endpoint_answers() {
        let client = build_client().unwrap();
        let outcome = run_http_probe(&client, "example.com", 443, Duration::from_secs(5)).await;
        assert_eq!(outcome, ProbeOutcome::Success);
    }
}
