// src/ui/summary.rs

use crate::app::{ProbeTally, RunSummary};
use crate::core::models::{ProbeKind, ScanResult};
use crate::ui::console::outcome_label;
use crossterm::style::Stylize;

const SUMMARY_PROBES: [ProbeKind; 4] = [ProbeKind::Ping, ProbeKind::Tcp, ProbeKind::Tls, ProbeKind::Http];

/// Per-host block printed once a host is done.
pub fn host_block(result: &ScanResult, color: bool) -> String {
    let title = format!("── {}:{} ──", result.host, result.port);
    let mut lines = vec![if color { title.bold().to_string() } else { title }];

    for kind in SUMMARY_PROBES {
        let status = result
            .outcome(kind)
            .map_or_else(|| "-".to_string(), |outcome| outcome_label(outcome, color));
        lines.push(format!("  {:<6}{}", kind.to_string().to_lowercase(), status));
    }

    let ports = if result.custom_ports.is_empty() {
        "-".to_string()
    } else {
        result.custom_ports.iter().map(u16::to_string).collect::<Vec<_>>().join(", ")
    };
    lines.push(format!("  {:<6}{}", "ports", ports));
    lines.join("\n")
}

/// Totals for the whole run.
pub fn run_summary(summary: &RunSummary, color: bool) -> String {
    let mut lines = vec![format!(
        "Scanned {} host(s) in {:.1}s, finished {}",
        summary.hosts,
        summary.elapsed.as_secs_f64(),
        summary.finished_at.format("%Y-%m-%d %H:%M:%S")
    )];

    for kind in SUMMARY_PROBES {
        lines.push(tally_line(kind, summary.tally(kind), color));
    }
    lines.push(format!("  hosts with open custom ports: {}", summary.hosts_with_custom_ports));
    lines.join("\n")
}

fn tally_line(kind: ProbeKind, tally: ProbeTally, color: bool) -> String {
    let ok = format!("ok {}", tally.ok);
    let fail = format!("fail {}", tally.fail);
    let (ok, fail) = if color {
        (ok.green().to_string(), fail.red().to_string())
    } else {
        (ok, fail)
    };
    format!("  {:<5} {}  {}  not run {}", kind.to_string(), ok, fail, tally.not_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProbeError;
    use crate::core::models::{ProbeOutcome, Target};

    #[test]
    fn host_block_marks_unrun_probes() {
        let mut result = ScanResult::new(&Target::new("example.com", 443));
        result.ping = Some(ProbeOutcome::Success);
        result.tcp = Some(ProbeOutcome::failed(ProbeError::ConnectionRefused));
        result.custom_ports = vec![80, 8080];

        let block = host_block(&result, false);
        assert_eq!(
            block,
            "── example.com:443 ──\n  ping  OK\n  tcp   FAIL\n  tls   -\n  http  -\n  ports 80, 8080"
        );
    }
}
