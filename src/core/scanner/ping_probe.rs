// src/core/scanner/ping_probe.rs

use tracing::{debug, warn};

use crate::core::error::ProbeError;
use crate::core::models::ProbeOutcome;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Sends one ICMP echo through the system `ping` binary.
///
/// Raw ICMP sockets need privileges, the `ping` binary already has them. The
/// child is killed if the deadline passes first.
pub async fn run_ping_probe(host: &str, deadline: Duration) -> ProbeOutcome {
    if host.is_empty() || host.starts_with('-') {
        return ProbeOutcome::failed(ProbeError::MalformedTarget(host.to_string()));
    }

    let wait_secs = deadline.as_secs().max(1).to_string();
    let child = Command::new("ping")
        .args(["-c", "1", "-W", wait_secs.as_str(), host])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    // `ping -W` only bounds the wait for the reply; name resolution is on top.
    match timeout(deadline + Duration::from_millis(500), child).await {
        Ok(Ok(status)) if status.success() => {
            debug!(host, "Echo reply received.");
            ProbeOutcome::Success
        }
        Ok(Ok(status)) => {
            debug!(host, code = ?status.code(), "No echo reply.");
            ProbeOutcome::failed(ProbeError::NetworkUnreachable(format!(
                "no echo reply (ping exited with {})",
                status.code().map_or_else(|| "a signal".to_string(), |c| c.to_string())
            )))
        }
        Ok(Err(e)) => {
            warn!(host, error = %e, "Could not run ping.");
            ProbeOutcome::failed(ProbeError::Protocol(format!("could not run ping: {}", e)))
        }
        Err(_) => ProbeOutcome::failed(ProbeError::timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn option_like_hosts_are_not_passed_to_ping() {
        let outcome = run_ping_probe("-f", Duration::from_secs(1)).await;
        assert_eq!(
            outcome,
            ProbeOutcome::failed(ProbeError::MalformedTarget("-f".to_string()))
        );
    }

    #[tokio::test]
    #[ignore]
    async fn loopback_answers_ping() {
        let outcome = run_ping_probe("127.0.0.1", Duration::from_secs(1)).await;
        assert_eq!(outcome, ProbeOutcome::Success);
    }
}
