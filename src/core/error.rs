// src/core/error.rs

//! Error types used across the scanner.
//!
//! Probe errors never escape a probe: they are folded into
//! [`ProbeOutcome::Failure`](crate::core::models::ProbeOutcome) so the cause can
//! be shown next to the `FAIL` tag. The other enums cover the few things that
//! can stop a run before or after the probing itself.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single probe failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("connection refused")]
    ConnectionRefused,

    #[error("timed out ({0})")]
    Timeout(String),

    #[error("handshake rejected: {0}")]
    HandshakeRejected(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("malformed target: {0}")]
    MalformedTarget(String),
}

impl ProbeError {
    /// Maps a socket-level error onto the probe taxonomy.
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => ProbeError::ConnectionRefused,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeError::Timeout(err.to_string()),
            io::ErrorKind::InvalidInput => ProbeError::MalformedTarget(err.to_string()),
            _ => ProbeError::NetworkUnreachable(err.to_string()),
        }
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        ProbeError::Timeout(format!("no answer within {} ms", after.as_millis()))
    }
}

/// Malformed user input while building the target list.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid CIDR '{input}': {reason}")]
    InvalidCidr { input: String, reason: String },

    #[error("CIDR '{input}' expands to {size} addresses (limit is {limit})")]
    RangeTooLarge { input: String, size: u128, limit: u128 },

    #[error("could not read target file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no targets to scan")]
    Empty,
}

/// Failure to persist the result document. This is the one fatal error of a run.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid result JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("progress already reached {total}/{total}")]
    AlreadyDone { total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_connections_keep_their_kind() {
        let err = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(ProbeError::from_io(&err), ProbeError::ConnectionRefused);
    }

    #[test]
    fn unknown_socket_errors_become_unreachable() {
        let err = io::Error::other("failed to lookup address information");
        match ProbeError::from_io(&err) {
            ProbeError::NetworkUnreachable(cause) => assert!(cause.contains("lookup")),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn timeout_message_carries_the_deadline() {
        let err = ProbeError::timeout(std::time::Duration::from_secs(3));
        assert_eq!(err.to_string(), "timed out (no answer within 3000 ms)");
    }
}
