// src/main.rs

use clap::Parser;
use color_eyre::eyre::Result;
use connprobe::app::{App, OutputOptions, RunSummary};
use connprobe::core::export::read_json;
use connprobe::core::models::Target;
use connprobe::core::targets;
use connprobe::logging::initialize_logging;
use connprobe::ui::summary::run_summary;
use std::io::{stdin, stdout, IsTerminal};
use std::time::Duration;
use tracing::{error, info};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let log_path = initialize_logging(cli.verbose)?;
    info!(log = %log_path.display(), "connprobe starting.");

    let color = stdout().is_terminal();
    let port = cli.scan.port;

    let targets: Vec<Target> = match &cli.command {
        Command::Single { host } => targets::single(host, port),
        Command::Bulk { file: Some(path), .. } => targets::from_file(path, port)?,
        Command::Bulk { list: Some(list), .. } => targets::from_list(list, port),
        Command::Bulk { .. } => {
            if stdin().is_terminal() {
                eprintln!("Paste hosts, one per line, then an empty line:");
            }
            targets::from_reader(stdin().lock(), port)?
        }
        Command::Cidr { cidr } => match targets::from_cidr(cidr, port) {
            Ok(targets) => targets,
            Err(e) => {
                error!(error = %e, "Rejected CIDR input.");
                return Err(e.into());
            }
        },
        Command::Summary { path } => {
            let results = read_json(path)?;
            let summary = RunSummary::from_results(&results, Duration::ZERO);
            println!("{}", run_summary(&summary, color));
            return Ok(());
        }
    };

    let output = OutputOptions {
        json_path: cli.scan.json_path(),
        quiet: cli.scan.quiet,
        host_blocks: cli.scan.host_summary,
        color,
    };
    let mut app = App::new(cli.scan.run_config(), output);
    app.run(targets).await?;

    info!("connprobe finished.");
    Ok(())
}
