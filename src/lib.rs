// src/lib.rs

//! Connectivity probing for lists of hosts.
//!
//! For each target the scanner checks ICMP reachability, a TCP connect, a TLS
//! handshake (only after a successful connect), an HTTPS GET and a set of
//! extra TCP ports, then reports one [`ScanResult`](core::models::ScanResult)
//! per target.

pub mod app;
pub mod core;
pub mod logging;
pub mod ui;
