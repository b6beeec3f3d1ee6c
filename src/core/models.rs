// src/core/models.rs

use crate::core::error::ProbeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use strum::Display;
use url::Url;

/// Port probed when a target does not name one.
pub const DEFAULT_PORT: u16 = 443;

/// Default number of hosts scanned at the same time.
pub const DEFAULT_CONCURRENCY: usize = 256;

// --- Targets ---

/// One host to probe, with the port used by the TCP, TLS and HTTP probes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    /// Builds a target from user input.
    ///
    /// Accepts a bare host or address, `host:port`, `[v6]:port` and full URLs
    /// (`https://example.com:8443/path`). Anything that does not fit is kept
    /// verbatim as the host, so a malformed entry still produces a target whose
    /// probes simply fail.
    pub fn parse(input: &str, default_port: u16) -> Self {
        let raw = input.trim();

        if raw.contains("://") {
            let parsed = Url::parse(raw).ok();
            return match parsed.as_ref().and_then(|url| url.host_str()) {
                Some(host) => Self::new(
                    host.trim_start_matches('[').trim_end_matches(']'),
                    parsed.as_ref().and_then(Url::port).unwrap_or(default_port),
                ),
                None => Self::new(raw, default_port),
            };
        }

        if raw.parse::<IpAddr>().is_ok() {
            return Self::new(raw, default_port);
        }

        if let Some((host, tail)) = raw.strip_prefix('[').and_then(|rest| rest.split_once(']')) {
            let port = tail
                .strip_prefix(':')
                .and_then(|p| p.parse().ok())
                .unwrap_or(default_port);
            return Self::new(host, port);
        }

        if let Some((host, port)) = raw.rsplit_once(':') {
            if let Ok(port) = port.parse::<u16>() {
                return Self::new(host, port);
            }
        }

        Self::new(raw, default_port)
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn address(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{}]:{}", self.host, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

// --- Probes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ProbeKind {
    #[strum(serialize = "PING")]
    Ping,
    #[strum(serialize = "TCP")]
    Tcp,
    #[strum(serialize = "TLS")]
    Tls,
    #[strum(serialize = "HTTP")]
    Http,
    #[strum(serialize = "PORT")]
    CustomPort,
}

/// Result of a single probe. There is no partial state: a probe either
/// answered in time or it did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success,
    /// The cause is absent when the outcome was read back from a result file.
    Failure(Option<ProbeError>),
}

impl ProbeOutcome {
    pub fn failed(cause: ProbeError) -> Self {
        ProbeOutcome::Failure(Some(cause))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success)
    }

    pub fn cause(&self) -> Option<&ProbeError> {
        match self {
            ProbeOutcome::Success => None,
            ProbeOutcome::Failure(cause) => cause.as_ref(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Success => "OK",
            ProbeOutcome::Failure(_) => "FAIL",
        }
    }
}

// --- Scan results ---

/// Aggregated outcome of every probe run against one target.
///
/// A probe field left at `None` means the probe was not run; it is written as
/// an empty string in the result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub host: String,
    #[serde(with = "port_field")]
    pub port: u16,
    #[serde(with = "outcome_field", default)]
    pub ping: Option<ProbeOutcome>,
    #[serde(with = "outcome_field", default)]
    pub tcp: Option<ProbeOutcome>,
    #[serde(with = "outcome_field", default)]
    pub tls: Option<ProbeOutcome>,
    #[serde(with = "outcome_field", default)]
    pub http_get: Option<ProbeOutcome>,
    #[serde(deserialize_with = "null_as_empty", default)]
    pub custom_ports: Vec<u16>,
}

impl ScanResult {
    pub fn new(target: &Target) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            ping: None,
            tcp: None,
            tls: None,
            http_get: None,
            custom_ports: Vec::new(),
        }
    }

    /// Stand-in for a host whose scan never reported back. Every probe that
    /// would have run is marked failed; TLS stays unset since TCP did not pass.
    pub fn unreported(target: &Target, mode: ScanMode, cause: &str) -> Self {
        let failed = || Some(ProbeOutcome::failed(ProbeError::Protocol(cause.to_string())));
        Self {
            ping: failed(),
            tcp: failed(),
            http_get: if mode.runs_http() { failed() } else { None },
            ..Self::new(target)
        }
    }

    pub fn outcome(&self, kind: ProbeKind) -> Option<&ProbeOutcome> {
        match kind {
            ProbeKind::Ping => self.ping.as_ref(),
            ProbeKind::Tcp => self.tcp.as_ref(),
            ProbeKind::Tls => self.tls.as_ref(),
            ProbeKind::Http => self.http_get.as_ref(),
            ProbeKind::CustomPort => None,
        }
    }
}

mod outcome_field {
    use super::ProbeOutcome;
    use serde::de::{self, Deserialize, Deserializer};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<ProbeOutcome>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_ref().map_or("", ProbeOutcome::label))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ProbeOutcome>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        match raw.as_str() {
            "" => Ok(None),
            "OK" => Ok(Some(ProbeOutcome::Success)),
            "FAIL" => Ok(Some(ProbeOutcome::Failure(None))),
            other => Err(de::Error::unknown_variant(other, &["OK", "FAIL", ""])),
        }
    }
}

// Ports are written as strings to stay compatible with existing result files.
mod port_field {
    use serde::de::{self, Deserialize, Deserializer};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(port: &u16, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(port)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u16, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(de::Error::custom)
    }
}

fn null_as_empty<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<u16>, D::Error> {
    Ok(Option::<Vec<u16>>::deserialize(d)?.unwrap_or_default())
}

// --- Run configuration ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScanMode {
    /// Ping, TCP, TLS, HTTP GET and custom ports.
    #[strum(serialize = "full")]
    Full,
    /// TCP-only check: ping, the primary TCP connect and custom ports.
    /// TLS and the HTTP GET stay unset.
    #[strum(serialize = "selective")]
    Selective,
}

impl ScanMode {
    pub fn runs_tls(self) -> bool {
        matches!(self, ScanMode::Full)
    }

    pub fn runs_http(self) -> bool {
        matches!(self, ScanMode::Full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTimeouts {
    pub ping: Duration,
    pub tcp: Duration,
    pub tls: Duration,
    pub http: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            ping: Duration::from_secs(1),
            tcp: Duration::from_secs(3),
            tls: Duration::from_secs(5),
            http: Duration::from_secs(5),
        }
    }
}

/// Everything a run needs besides the target list. Read-only once the run starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: ScanMode,
    pub port: u16,
    pub custom_ports: Vec<u16>,
    pub timeouts: ProbeTimeouts,
    pub concurrency: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Full,
            port: DEFAULT_PORT,
            custom_ports: Vec::new(),
            timeouts: ProbeTimeouts::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
