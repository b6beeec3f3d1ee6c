// src/core/targets.rs

//! Turns user input into the list of targets for a run.

use crate::core::error::TargetError;
use crate::core::models::Target;
use ipnetwork::IpNetwork;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Largest CIDR range expanded into targets.
pub const MAX_CIDR_HOSTS: u128 = 65_536;

pub fn single(value: &str, port: u16) -> Vec<Target> {
    vec![Target::parse(value, port)]
}

/// Parses a comma- or newline-separated list. Blank entries and `#` comment
/// lines are skipped.
pub fn from_list(text: &str, port: u16) -> Vec<Target> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| Target::parse(entry, port))
        .collect()
}

pub fn from_file(path: &Path, port: u16) -> Result<Vec<Target>, TargetError> {
    let text = std::fs::read_to_string(path).map_err(|source| TargetError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let targets = from_list(&text, port);
    info!(path = %path.display(), count = targets.len(), "Loaded targets from file.");
    Ok(targets)
}

/// Reads pasted targets, one per line, up to the first blank line or EOF.
pub fn from_reader<R: BufRead>(reader: R, port: u16) -> Result<Vec<Target>, TargetError> {
    let mut targets = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| TargetError::Unreadable {
            path: "<stdin>".into(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        targets.push(Target::parse(line, port));
    }
    Ok(targets)
}

/// Every address of a CIDR prefix, network and broadcast included, ascending.
pub fn from_cidr(cidr: &str, port: u16) -> Result<Vec<Target>, TargetError> {
    let network = IpNetwork::from_str(cidr.trim()).map_err(|e| TargetError::InvalidCidr {
        input: cidr.to_string(),
        reason: e.to_string(),
    })?;

    // `size()` overflows on a /0, so work from the prefix length instead.
    let host_bits = match network {
        IpNetwork::V4(net) => 32 - u32::from(net.prefix()),
        IpNetwork::V6(net) => 128 - u32::from(net.prefix()),
    };
    let size = 1u128.checked_shl(host_bits).unwrap_or(u128::MAX);
    if size > MAX_CIDR_HOSTS {
        return Err(TargetError::RangeTooLarge {
            input: cidr.to_string(),
            size,
            limit: MAX_CIDR_HOSTS,
        });
    }

    // Iterate from the masked network address, whatever host bits were typed.
    let targets: Vec<Target> = match network {
        IpNetwork::V4(net) => net.iter().map(|ip| Target::new(ip.to_string(), port)).collect(),
        IpNetwork::V6(net) => net.iter().map(|ip| Target::new(ip.to_string(), port)).collect(),
    };
    debug!(cidr, count = targets.len(), "Expanded CIDR range.");
    Ok(targets)
}

/// Parses a comma-separated custom port list.
///
/// Tokens that are not a port number (or are `0`) are dropped without
/// complaint, as are repeats.
pub fn parse_port_list(input: &str) -> Vec<u16> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u16>() {
            Ok(port) if port != 0 => Some(port),
            _ => {
                debug!(token, "Skipping invalid custom port.");
                None
            }
        })
        .filter(|port| seen.insert(*port))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(targets: &[Target]) -> Vec<&str> {
        targets.iter().map(|t| t.host.as_str()).collect()
    }

    #[test]
    fn cidr_includes_network_and_broadcast_in_order() {
        let targets = from_cidr("192.168.1.0/30", 443).unwrap();
        assert_eq!(
            hosts(&targets),
            vec!["192.168.1.0", "192.168.1.1", "192.168.1.2", "192.168.1.3"]
        );
        assert!(targets.iter().all(|t| t.port == 443));
    }

    #[test]
    fn cidr_with_host_bits_starts_at_the_network() {
        let targets = from_cidr("10.0.0.5/31", 443).unwrap();
        assert_eq!(hosts(&targets), vec!["10.0.0.4", "10.0.0.5"]);
    }

    #[test]
    fn single_address_prefix() {
        assert_eq!(hosts(&from_cidr("10.1.2.3/32", 443).unwrap()), vec!["10.1.2.3"]);
    }

    #[test]
    fn bad_cidr_is_rejected() {
        assert!(matches!(
            from_cidr("192.168.1.0/33", 443),
            Err(TargetError::InvalidCidr { .. })
        ));
        assert!(matches!(from_cidr("nonsense", 443), Err(TargetError::InvalidCidr { .. })));
    }

    #[test]
    fn huge_ranges_are_refused() {
        assert!(matches!(
            from_cidr("10.0.0.0/8", 443),
            Err(TargetError::RangeTooLarge { size: 16_777_216, .. })
        ));
        assert!(matches!(from_cidr("2001:db8::/64", 443), Err(TargetError::RangeTooLarge { .. })));
        assert!(matches!(
            from_cidr("0.0.0.0/0", 443),
            Err(TargetError::RangeTooLarge { size: 4_294_967_296, .. })
        ));
        assert!(matches!(from_cidr("::/0", 443), Err(TargetError::RangeTooLarge { .. })));
    }

    #[test]
    fn largest_allowed_range_is_expanded() {
        let targets = from_cidr("10.1.0.0/16", 443).unwrap();
        assert_eq!(targets.len(), 65_536);
        assert_eq!(targets[0].host, "10.1.0.0");
        assert_eq!(targets[65_535].host, "10.1.255.255");
    }

    #[test]
    fn list_accepts_commas_newlines_and_comments() {
        let text = "a.example, b.example\n# skipped\n\nc.example:8443\n";
        let targets = from_list(text, 443);
        assert_eq!(hosts(&targets), vec!["a.example", "b.example", "c.example"]);
        assert_eq!(targets[2].port, 8443);
    }

    #[test]
    fn pasted_lines_stop_at_the_first_blank_line() {
        let input = "one.example\ntwo.example\n\nthree.example\n";
        let targets = from_reader(input.as_bytes(), 443).unwrap();
        assert_eq!(hosts(&targets), vec!["one.example", "two.example"]);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = from_file(Path::new("/definitely/not/here.txt"), 443).unwrap_err();
        assert!(matches!(err, TargetError::Unreadable { .. }));
    }

    #[test]
    fn port_list_skips_junk() {
        assert_eq!(parse_port_list("80,8080"), vec![80, 8080]);
        assert_eq!(parse_port_list("80, abc, 0, 70000, 80,22"), vec![80, 22]);
        assert!(parse_port_list("").is_empty());
    }
}
