//! dwg-plot - CLI tool to batch convert DWG drawings to PDF.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dwg_plot_rs::{find_drawings, plan, BatchConverter, BatchError, CommandLauncher, Config};

/// Plot every DWG drawing in a folder to a PDF next to it.
#[derive(Parser, Debug)]
#[command(name = "dwg-plot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder holding the drawings
    input_dir: Option<PathBuf>,

    /// JSON config file; command-line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extension of the drawings to convert
    #[arg(long)]
    extension: Option<String>,

    /// Attempts when the application is busy
    #[arg(long)]
    max_retries: Option<u32>,

    /// Pause between attempts in milliseconds
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Plot configuration used for the export
    #[arg(long)]
    profile: Option<String>,

    /// Program identifier of the drawing application
    #[arg(long)]
    prog_id: Option<String>,

    /// Plotter executable
    #[arg(long)]
    plotter: Option<PathBuf>,

    /// Plotter argument template (repeatable); supports {input}, {output}, {profile}, {prog_id}
    #[arg(long = "plotter-arg", allow_hyphen_values = true)]
    plotter_args: Vec<String>,

    /// Plotter exit code meaning "application busy"
    #[arg(long)]
    busy_exit_code: Option<i32>,

    /// Write a JSON report of the run
    #[arg(long)]
    report: Option<PathBuf>,

    /// List the drawings and their PDF paths without plotting
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Merge the options into a config loaded from file (or the defaults).
    fn into_config(self) -> Result<(Config, Options)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(dir) = self.input_dir {
            config.input_dir = Some(dir);
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry_delay_ms = delay;
        }
        if let Some(profile) = self.profile {
            config.plot_profile = profile;
        }
        if let Some(prog_id) = self.prog_id {
            config.prog_id = prog_id;
        }
        if let Some(plotter) = self.plotter {
            config.plotter.command = plotter;
        }
        if !self.plotter_args.is_empty() {
            config.plotter.args = self.plotter_args;
        }
        if let Some(code) = self.busy_exit_code {
            config.plotter.busy_exit_code = code;
        }

        let options = Options {
            report: self.report,
            dry_run: self.dry_run,
        };
        Ok((config, options))
    }
}

/// Run options that are not part of the batch configuration.
struct Options {
    report: Option<PathBuf>,
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let (config, options) = args.into_config()?;
    let input_dir = config.validate()?.to_path_buf();

    let report = if options.dry_run {
        let files = find_drawings(&input_dir, config.extension())?;
        plan(&files)
    } else {
        let launcher = CommandLauncher::new(config.plotter.clone());
        let mut converter = BatchConverter::new(launcher, &config);

        match converter.run(&input_dir, config.extension()) {
            Ok(report) => report,
            Err(err @ BatchError::InitRetriesExhausted { .. }) => {
                error!("Failed to initialize the application after all retries.");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        }
    };

    if let Some(path) = &options.report {
        report
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    if options.dry_run {
        info!("{} drawing(s) would be plotted", report.files.len());
        return Ok(());
    }

    for failed in report.failures() {
        warn!("Not converted: {}", failed.input.display());
    }

    info!(
        "{} of {} drawing(s) converted",
        report.converted(),
        report.files.len()
    );

    if !report.is_success() {
        anyhow::bail!("{} drawing(s) failed to convert", report.failed());
    }

    Ok(())
}
