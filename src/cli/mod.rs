use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::level_filters::LevelFilter;

use crate::config::PackageFilter;
use crate::fetch::{HttpReportSource, ReportSource};

#[derive(Debug, Parser)]
#[command(
    name = "srufilter",
    version,
    about = "List the Ubuntu stable release updates that match a package allowlist, as CSV"
)]
pub struct Cli {
    /// YAML (or `.toml`) file with `packages` and `package_regexps`
    pub config: PathBuf,
    /// Log debug details to stderr
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Only log errors, and hide the download spinner
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else if self.quiet {
            LevelFilter::ERROR
        } else {
            LevelFilter::WARN
        }
    }
}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage(err),
    };

    init_logging(cli.log_level());

    let source = HttpReportSource::default().with_progress(!cli.quiet);
    let mut stdout = io::stdout().lock();
    execute(&cli, &source, &mut stdout)
}

/// Load the allowlist, fetch the report, print the matching rows.
///
/// Nothing is written to `out` unless both the config and the report load.
/// A reader closing `out` early is not an error.
pub fn execute<S, W>(cli: &Cli, source: &S, out: &mut W) -> Result<()>
where
    S: ReportSource + ?Sized,
    W: Write,
{
    let filter: PackageFilter =
        crate::config::load(&cli.config).map_err(crate::exit::config_err)?;
    let report = source.fetch().map_err(crate::exit::fetch_err)?;
    match crate::filter::write_csv(out, &report, &filter) {
        Ok(rows) => {
            tracing::debug!(rows, "wrote matching SRUs");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed before all rows were written");
            Ok(())
        }
        Err(err) => Err(anyhow::Error::new(err).context("failed to write CSV")),
    }
}

fn usage(err: clap::Error) -> Result<()> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print()?;
            Ok(())
        }
        _ => {
            let rendered = err.render().to_string();
            let message = rendered.strip_prefix("error: ").unwrap_or(&rendered);
            Err(crate::exit::invalid_args(message.trim_end()))
        }
    }
}

fn init_logging(level: LevelFilter) {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
