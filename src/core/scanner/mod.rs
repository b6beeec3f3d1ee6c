// src/core/scanner/mod.rs

// Each probe lives in its own module; this file runs them for one host.
pub mod http_probe;
pub mod ping_probe;
pub mod tcp_probe;
pub mod tls_probe;

use crate::core::models::{ProbeKind, ProbeOutcome, RunConfig, ScanResult, Target};
use self::http_probe::{build_client, run_http_probe};
use self::ping_probe::run_ping_probe;
use self::tcp_probe::run_tcp_probe;
use self::tls_probe::run_tls_probe;
use std::sync::Arc;
use tracing::{debug, info};

/// One finished probe, published as soon as it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEvent {
    pub target: Target,
    pub kind: ProbeKind,
    /// Port the probe talked to; the custom-port probes report their own port.
    pub port: u16,
    pub outcome: ProbeOutcome,
}

/// Runs the configured probes against one target at a time.
///
/// Cloning is cheap: the configuration is shared and `reqwest::Client` is
/// reference counted, so every host task gets its own copy.
#[derive(Clone)]
pub struct HostScanner {
    config: Arc<RunConfig>,
    client: reqwest::Client,
}

impl HostScanner {
    pub fn new(config: Arc<RunConfig>) -> Result<Self, reqwest::Error> {
        Ok(Self { config, client: build_client()? })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Probes `target` and returns its result.
    ///
    /// Ping, the TCP/TLS pair, the HTTP GET and the custom ports run side by
    /// side with `tokio::join!`. TLS is only attempted once TCP has connected,
    /// otherwise it is left unset. Selective mode stops after the TCP connects.
    /// No failure stops the other probes.
    pub async fn scan<F>(&self, target: &Target, on_probe: F) -> ScanResult
    where
        F: Fn(ProbeEvent),
    {
        info!(target = %target, mode = %self.config.mode, "Starting host scan.");
        let timeouts = self.config.timeouts;
        let publish = |kind: ProbeKind, port: u16, outcome: &ProbeOutcome| {
            on_probe(ProbeEvent { target: target.clone(), kind, port, outcome: outcome.clone() });
        };

        let ping = async {
            let outcome = run_ping_probe(&target.host, timeouts.ping).await;
            publish(ProbeKind::Ping, target.port, &outcome);
            outcome
        };

        let transport = async {
            let tcp = run_tcp_probe(&target.host, target.port, timeouts.tcp).await;
            publish(ProbeKind::Tcp, target.port, &tcp);
            let tls = if !self.config.mode.runs_tls() {
                None
            } else if tcp.is_success() {
                let tls = run_tls_probe(&target.host, target.port, timeouts.tls).await;
                publish(ProbeKind::Tls, target.port, &tls);
                Some(tls)
            } else {
                debug!(target = %target, "TCP failed, skipping TLS handshake.");
                None
            };
            (tcp, tls)
        };

        let http = async {
            if !self.config.mode.runs_http() {
                return None;
            }
            let outcome = run_http_probe(&self.client, &target.host, target.port, timeouts.http).await;
            publish(ProbeKind::Http, target.port, &outcome);
            Some(outcome)
        };

        let custom_ports = async {
            let mut open = Vec::new();
            for &port in &self.config.custom_ports {
                let outcome = run_tcp_probe(&target.host, port, timeouts.tcp).await;
                publish(ProbeKind::CustomPort, port, &outcome);
                if outcome.is_success() {
                    open.push(port);
                }
            }
            open
        };

        let (ping, (tcp, tls), http_get, custom_ports) = tokio::join!(ping, transport, http, custom_ports);

        let result = ScanResult {
            ping: Some(ping),
            tcp: Some(tcp),
            tls,
            http_get,
            custom_ports,
            ..ScanResult::new(target)
        };
        info!(target = %target, open_custom_ports = result.custom_ports.len(), "Host scan finished.");
        result
    }
}
