// src/app.rs

use crate::core::coordinator::run_scan;
use crate::core::error::TargetError;
use crate::core::export::write_json;
use crate::core::models::{ProbeKind, ProbeOutcome, RunConfig, ScanResult, Target};
use crate::core::progress::Progress;
use crate::core::scanner::HostScanner;
use crate::ui::summary::run_summary;
use crate::ui::ConsoleReporter;
use chrono::{DateTime, Local};
use color_eyre::eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Idle,
    Disabled,
    Written(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

/// How a run talks to the user.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Where to write the JSON result file, `None` to skip it.
    pub json_path: Option<PathBuf>,
    /// No progress bar and no per-probe lines.
    pub quiet: bool,
    /// Print a block per host once it is done.
    pub host_blocks: bool,
    pub color: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTally {
    pub ok: usize,
    pub fail: usize,
    pub not_run: usize,
}

impl ProbeTally {
    fn record(&mut self, outcome: Option<&ProbeOutcome>) {
        match outcome {
            Some(ProbeOutcome::Success) => self.ok += 1,
            Some(ProbeOutcome::Failure(_)) => self.fail += 1,
            None => self.not_run += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub hosts: usize,
    pub ping: ProbeTally,
    pub tcp: ProbeTally,
    pub tls: ProbeTally,
    pub http: ProbeTally,
    pub hosts_with_custom_ports: usize,
    pub elapsed: Duration,
    pub finished_at: DateTime<Local>,
}

impl RunSummary {
    pub fn from_results(results: &[ScanResult], elapsed: Duration) -> Self {
        let mut summary = Self {
            hosts: results.len(),
            ping: ProbeTally::default(),
            tcp: ProbeTally::default(),
            tls: ProbeTally::default(),
            http: ProbeTally::default(),
            hosts_with_custom_ports: 0,
            elapsed,
            finished_at: Local::now(),
        };
        for result in results {
            summary.ping.record(result.ping.as_ref());
            summary.tcp.record(result.tcp.as_ref());
            summary.tls.record(result.tls.as_ref());
            summary.http.record(result.http_get.as_ref());
            if !result.custom_ports.is_empty() {
                summary.hosts_with_custom_ports += 1;
            }
        }
        summary
    }

    pub fn tally(&self, kind: ProbeKind) -> ProbeTally {
        match kind {
            ProbeKind::Ping => self.ping,
            ProbeKind::Tcp => self.tcp,
            ProbeKind::Tls => self.tls,
            ProbeKind::Http => self.http,
            ProbeKind::CustomPort => ProbeTally::default(),
        }
    }
}

pub struct App {
    pub state: AppState,
    pub config: Arc<RunConfig>,
    pub output: OutputOptions,
    pub results: Vec<ScanResult>,
    pub summary: Option<RunSummary>,
    pub export_status: ExportStatus,
}

impl App {
    pub fn new(config: RunConfig, output: OutputOptions) -> Self {
        Self {
            state: AppState::Idle,
            config: Arc::new(config),
            output,
            results: Vec::new(),
            summary: None,
            export_status: ExportStatus::Idle,
        }
    }

    /// Scans `targets`, prints the run summary and writes the result file.
    ///
    /// An empty target list is rejected before anything starts. Failing to
    /// write the result file is the only error once probing has begun.
    pub async fn run(&mut self, targets: Vec<Target>) -> Result<()> {
        if targets.is_empty() {
            return Err(TargetError::Empty.into());
        }

        self.state = AppState::Scanning;
        info!(targets = targets.len(), mode = %self.config.mode, port = self.config.port, "Run started.");

        let scanner = HostScanner::new(Arc::clone(&self.config)).wrap_err("could not set up the HTTP client")?;
        let mut progress = if self.output.quiet {
            Progress::hidden(targets.len())
        } else {
            Progress::new(targets.len())
        };
        let reporter = ConsoleReporter::new(self.output.color, !self.output.quiet, self.output.host_blocks);
        let bar = progress.bar().clone();

        let started = Instant::now();
        let results = run_scan(scanner, targets, &mut progress, |event| reporter.handle(event, &bar)).await;
        let summary = RunSummary::from_results(&results, started.elapsed());

        println!("\n{}", run_summary(&summary, self.output.color));
        self.results = results;
        self.summary = Some(summary);

        self.export()?;
        self.state = AppState::Finished;
        Ok(())
    }

    fn export(&mut self) -> Result<()> {
        let Some(path) = self.output.json_path.clone() else {
            self.export_status = ExportStatus::Disabled;
            return Ok(());
        };
        write_json(&path, &self.results)?;
        println!("Results saved to {}", path.display());
        self.export_status = ExportStatus::Written(path);
        Ok(())
    }
}
