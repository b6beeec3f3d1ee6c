// src/core/scanner/tcp_probe.rs

use tracing::debug;

use crate::core::error::ProbeError;
use crate::core::models::ProbeOutcome;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Opens a TCP connection to `host:port` and closes it straight away.
///
/// Name resolution happens inside the connect, so an unknown host shows up as
/// a failure like any other.
pub async fn run_tcp_probe(host: &str, port: u16, deadline: Duration) -> ProbeOutcome {
    debug!(host, port, "Connecting TCP stream.");
    match timeout(deadline, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            debug!(host, port, "TCP connect succeeded.");
            ProbeOutcome::Success
        }
        Ok(Err(e)) => {
            debug!(host, port, error = %e, "TCP connect failed.");
            ProbeOutcome::failed(ProbeError::from_io(&e))
        }
        Err(_) => {
            debug!(host, port, "TCP connect timed out.");
            ProbeOutcome::failed(ProbeError::timeout(deadline))
        }
    }
}
