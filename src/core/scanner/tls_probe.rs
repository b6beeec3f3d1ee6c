// src/core/scanner/tls_probe.rs

use tracing::{debug, error};

use crate::core::error::ProbeError;
use crate::core::models::ProbeOutcome;
use native_tls::{HandshakeError, TlsConnector};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use tokio::task::spawn_blocking;
use tokio::time::timeout;

/// Attempts a TLS handshake with `host:port`.
///
/// Certificates are not verified: the probe only asks whether the server
/// completes a handshake, not whether it should be trusted. The handshake runs
/// on the blocking pool because `native-tls` drives a std socket.
pub async fn run_tls_probe(host: &str, port: u16, deadline: Duration) -> ProbeOutcome {
    let host_owned = host.to_string();

    debug!(host, port, "Spawning blocking task for TLS handshake.");
    let handshake = spawn_blocking(move || perform_handshake(&host_owned, port, deadline));

    // The socket timeouts bound each read and write; this bounds the whole attempt.
    match timeout(deadline, handshake).await {
        Ok(Ok(Ok(()))) => {
            debug!(host, port, "TLS handshake completed.");
            ProbeOutcome::Success
        }
        Ok(Ok(Err(e))) => {
            debug!(host, port, error = %e, "TLS handshake failed.");
            ProbeOutcome::failed(e)
        }
        Ok(Err(e)) => {
            error!(panic = %e, "Blocking TLS task panicked!");
            ProbeOutcome::failed(ProbeError::Protocol(format!("task panicked: {}", e)))
        }
        Err(_) => ProbeOutcome::failed(ProbeError::timeout(deadline)),
    }
}

fn perform_handshake(host: &str, port: u16, deadline: Duration) -> Result<(), ProbeError> {
    let expires = Instant::now() + deadline;
    let connector = TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .use_sni(true)
        .build()
        .map_err(|e| {
            error!(error = %e, "Failed to create TlsConnector");
            ProbeError::Protocol(format!("TlsConnector error: {}", e))
        })?;

    let stream = connect(host, port, expires, deadline)?;
    let left = remaining(expires, deadline)?;
    stream
        .set_read_timeout(Some(left))
        .and_then(|_| stream.set_write_timeout(Some(left)))
        .map_err(|e| ProbeError::from_io(&e))?;

    debug!(host, port, "Performing TLS handshake.");
    match connector.connect(host, stream) {
        Ok(mut tls) => {
            let _ = tls.shutdown();
            let _ = tls.get_ref().shutdown(Shutdown::Both);
            Ok(())
        }
        Err(HandshakeError::Failure(e)) => Err(ProbeError::HandshakeRejected(e.to_string())),
        // A blocking socket only stops mid-handshake when a read or write timed out.
        Err(HandshakeError::WouldBlock(mid)) => {
            let _ = mid.get_ref().shutdown(Shutdown::Both);
            Err(ProbeError::timeout(deadline))
        }
    }
}

/// Time left before `expires`; a spent budget is a timeout.
fn remaining(expires: Instant, deadline: Duration) -> Result<Duration, ProbeError> {
    expires
        .checked_duration_since(Instant::now())
        .filter(|left| !left.is_zero())
        .ok_or_else(|| ProbeError::timeout(deadline))
}

/// Connects to the first resolved address that answers, all of them sharing
/// one budget.
fn connect(host: &str, port: u16, expires: Instant, deadline: Duration) -> Result<TcpStream, ProbeError> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| ProbeError::NetworkUnreachable(format!("could not resolve {}: {}", host, e)))?;

    let mut last_err = None;
    for addr in addrs {
        let left = remaining(expires, deadline)?;
        match TcpStream::connect_timeout(&addr, left) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(ProbeError::from_io(&e)),
        }
    }
    Err(last_err.unwrap_or_else(|| ProbeError::NetworkUnreachable(format!("no address for {}", host))))
}
