/*!
 * Command-line interface for txtdump
 */

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use txtdump::config::{Args, Command, ExportArgs, ExportConfig, TreeArgs, TreeConfig};
use txtdump::error::Result;
use txtdump::exporter::Exporter;
use txtdump::report::{ReportFormat, Reporter};
use txtdump::tree::map_folder_structure;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "txtdump", &mut io::stdout());
        return Ok(());
    }

    match args.command {
        Some(Command::Export(export)) => run_export(export),
        Some(Command::Tree(tree)) => run_tree(tree),
        None => {
            Args::command().print_help()?;
            Ok(())
        }
    }
}

fn run_export(args: ExportArgs) -> Result<()> {
    let config = ExportConfig::from_args(args);
    if let Err(e) = config.validate() {
        warn!("export not started: {}", e);
        println!("Export not started: {}", e);
        return Ok(());
    }

    let progress = if config.show_progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {pos} files {wide_msg:.dim.white}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_prefix("📊 Exporting");
        bar.set_message(format!("📂 Walking {}", config.root.display()));
        bar
    } else {
        ProgressBar::hidden()
    };

    let exporter = Exporter::new(config, Arc::new(progress.clone()));
    let summary = exporter.run();

    progress.finish_and_clear();

    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_report(&summary);

    Ok(())
}

fn run_tree(args: TreeArgs) -> Result<()> {
    let config = TreeConfig::from_args(args);
    map_folder_structure(&config)?;
    println!("Folder structure saved to {}", config.output_file.display());
    Ok(())
}
