// src/ui/console.rs

use crate::core::coordinator::ScanEvent;
use crate::core::models::{ProbeKind, ProbeOutcome};
use crate::core::scanner::ProbeEvent;
use crate::ui::summary::host_block;
use crossterm::style::Stylize;
use indicatif::ProgressBar;

/// Prints scan events as they arrive.
///
/// Lines from different hosts interleave in arrival order. Printing goes
/// through [`ProgressBar::suspend`] so the bar is redrawn underneath.
pub struct ConsoleReporter {
    color: bool,
    probe_lines: bool,
    host_blocks: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool, probe_lines: bool, host_blocks: bool) -> Self {
        Self { color, probe_lines, host_blocks }
    }

    pub fn handle(&self, event: &ScanEvent, bar: &ProgressBar) {
        match event {
            ScanEvent::Probe(probe) if self.probe_lines => {
                let line = probe_line(probe, self.color);
                bar.suspend(|| println!("{}", line));
            }
            ScanEvent::HostFinished { result, .. } if self.host_blocks => {
                let block = host_block(result, self.color);
                bar.suspend(|| println!("{}", block));
            }
            _ => {}
        }
    }
}

/// `[TCP ] example.com:443 FAIL (connection refused)`
pub fn probe_line(event: &ProbeEvent, color: bool) -> String {
    let tag = format!("[{:<4}]", event.kind.to_string());
    let subject = match event.kind {
        ProbeKind::Ping => event.target.host.clone(),
        _ => {
            let mut target = event.target.clone();
            target.port = event.port;
            target.address()
        }
    };
    let status = outcome_label(&event.outcome, color);
    match event.outcome.cause() {
        Some(cause) => format!("{} {} {} ({})", tag, subject, status, cause),
        None => format!("{} {} {}", tag, subject, status),
    }
}

pub(crate) fn outcome_label(outcome: &ProbeOutcome, color: bool) -> String {
    match (outcome, color) {
        (ProbeOutcome::Success, true) => outcome.label().green().bold().to_string(),
        (ProbeOutcome::Failure(_), true) => outcome.label().red().bold().to_string(),
        _ => outcome.label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProbeError;
    use crate::core::models::Target;

    fn event(kind: ProbeKind, port: u16, outcome: ProbeOutcome) -> ProbeEvent {
        ProbeEvent { target: Target::new("example.com", 443), kind, port, outcome }
    }

    #[test]
    fn successful_probe_line() {
        let line = probe_line(&event(ProbeKind::Tcp, 443, ProbeOutcome::Success), false);
        assert_eq!(line, "[TCP ] example.com:443 OK");
    }

    #[test]
    fn failed_probe_line_carries_the_cause() {
        let outcome = ProbeOutcome::failed(ProbeError::ConnectionRefused);
        let line = probe_line(&event(ProbeKind::Tls, 443, outcome), false);
        assert_eq!(line, "[TLS ] example.com:443 FAIL (connection refused)");
    }

    #[test]
    fn ping_line_has_no_port_and_custom_ports_show_their_own() {
        let ping = probe_line(&event(ProbeKind::Ping, 443, ProbeOutcome::Success), false);
        assert_eq!(ping, "[PING] example.com OK");
        let custom = probe_line(&event(ProbeKind::CustomPort, 8080, ProbeOutcome::Success), false);
        assert_eq!(custom, "[PORT] example.com:8080 OK");
    }
}
