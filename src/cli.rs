// src/cli.rs

use clap::{Args, Parser, Subcommand};
use connprobe::core::export::DEFAULT_OUTPUT;
use connprobe::core::models::{
    DEFAULT_CONCURRENCY, DEFAULT_PORT, ProbeTimeouts, RunConfig, ScanMode,
};
use connprobe::core::targets::parse_port_list;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "connprobe",
    version,
    about = "Checks ping, TCP, TLS and HTTPS reachability for one host, a list or a CIDR range"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Also log to stderr at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a single host, address or URL
    Single {
        host: String,
    },
    /// Scan a list of hosts from a file, a comma-separated list or stdin
    Bulk {
        /// File with one host per line (`#` starts a comment)
        #[arg(short, long, conflicts_with = "list")]
        file: Option<PathBuf>,

        /// Comma-separated hosts
        #[arg(short, long)]
        list: Option<String>,
    },
    /// Scan every address of a CIDR range, network and broadcast included
    Cidr {
        cidr: String,
    },
    /// Print the summary of a saved result file without scanning
    Summary {
        #[arg(default_value = DEFAULT_OUTPUT)]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// TCP-only check: ping, TCP connect and custom ports, no TLS or HTTPS GET
    #[arg(long, global = true)]
    pub selective: bool,

    /// Port for the TCP, TLS and HTTPS probes
    #[arg(short, long, default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Extra ports to try a TCP connect on, e.g. "80,8080"
    #[arg(short, long, default_value = "", global = true)]
    pub custom_ports: String,

    /// Result file, overwritten on every run
    #[arg(short, long, default_value = DEFAULT_OUTPUT, global = true)]
    pub output: PathBuf,

    /// Do not write the result file
    #[arg(long, global = true)]
    pub no_json: bool,

    /// No progress bar and no per-probe lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print a summary block for each host as it finishes
    #[arg(long, global = true)]
    pub host_summary: bool,

    /// Hosts scanned at the same time (0 for no limit)
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY, global = true)]
    pub concurrency: usize,

    #[arg(long, default_value_t = 1000, global = true)]
    pub ping_timeout_ms: u64,

    #[arg(long, default_value_t = 3000, global = true)]
    pub tcp_timeout_ms: u64,

    #[arg(long, default_value_t = 5000, global = true)]
    pub tls_timeout_ms: u64,

    #[arg(long, default_value_t = 5000, global = true)]
    pub http_timeout_ms: u64,
}

impl ScanArgs {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            mode: if self.selective { ScanMode::Selective } else { ScanMode::Full },
            port: self.port,
            custom_ports: parse_port_list(&self.custom_ports),
            timeouts: ProbeTimeouts {
                ping: Duration::from_millis(self.ping_timeout_ms.max(1)),
                tcp: Duration::from_millis(self.tcp_timeout_ms.max(1)),
                tls: Duration::from_millis(self.tls_timeout_ms.max(1)),
                http: Duration::from_millis(self.http_timeout_ms.max(1)),
            },
            concurrency: self.concurrency,
        }
    }

    pub fn json_path(&self) -> Option<PathBuf> {
        (!self.no_json).then(|| self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_full_scan() {
        let cli = Cli::parse_from(["connprobe", "single", "example.com"]);
        let config = cli.scan.run_config();
        assert_eq!(config.mode, ScanMode::Full);
        assert_eq!(config.port, 443);
        assert!(config.custom_ports.is_empty());
        assert_eq!(config.timeouts, ProbeTimeouts::default());
        assert_eq!(cli.scan.json_path(), Some(PathBuf::from("scan_results.json")));
    }

    #[test]
    fn options_after_the_subcommand_are_accepted() {
        let cli = Cli::parse_from([
            "connprobe", "cidr", "192.168.1.0/30", "--selective", "-c", "80,8080", "--no-json",
        ]);
        let config = cli.scan.run_config();
        assert_eq!(config.mode, ScanMode::Selective);
        assert_eq!(config.custom_ports, vec![80, 8080]);
        assert_eq!(cli.scan.json_path(), None);
        assert!(matches!(cli.command, Command::Cidr { ref cidr } if cidr == "192.168.1.0/30"));
    }
}
