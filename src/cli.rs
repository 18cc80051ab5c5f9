//! CLI argument definitions and the command driver.
//!
//! Arguments are defined with clap's derive macros; [`run`] wires the
//! layout, version policy, probe, builder, and reporter together and maps
//! the verdict to an exit code.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use crate::error::Result;
use crate::paths::PathLayout;
use crate::probe::{RuntimeProbe, SystemProbe};
use crate::report::{should_use_colors, CheckOutcome, ConsoleReporter, ReporterConfig};
use crate::requirements::RequirementSetBuilder;
use crate::version::VersionPolicy;

/// Readycheck - Environment readiness checker.
#[derive(Debug, Parser)]
#[command(name = "readycheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Install root to check (a marker manifest is searched upward from
    /// here; defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Application version (overrides the install root's manifest)
    #[arg(long, value_name = "VERSION", env = "READYCHECK_APP_VERSION")]
    pub app_version: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Run the check and report. Exit code 0 when every mandatory requirement
/// passed, 1 otherwise.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<ExitCode> {
    let start = match &cli.root {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let root = PathLayout::discover_root(&start);
    tracing::debug!("Checking install root {}", root.display());

    let layout = PathLayout::resolve(&root);
    let policy = VersionPolicy::resolve(&root, cli.app_version.as_deref())?;
    tracing::debug!(
        "Application version {} requires interpreter {}+",
        policy.app_version,
        policy.minimum_interpreter
    );

    let probe = SystemProbe::discover(&layout);
    let collection = RequirementSetBuilder::build(&layout, &policy, &probe);

    match cli.format {
        Format::Text if cli.quiet => {}
        Format::Text => {
            let color = !cli.no_color && should_use_colors();
            let reporter = ConsoleReporter::new(ReporterConfig::new(color));
            reporter.report(out, &collection, &policy)?;
            if cli.verbose {
                reporter.report_checks(out, &collection)?;
            }
        }
        Format::Json => {
            let outcome =
                CheckOutcome::from_collection(&collection, probe.config_file_path());
            serde_json::to_writer_pretty(&mut *out, &outcome)
                .map_err(|e| crate::error::ReadycheckError::Report(e.into()))?;
            writeln!(out)?;
        }
    }

    if collection.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
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
    fn parses_root_and_overrides() {
        let cli = Cli::parse_from([
            "readycheck",
            "/srv/app",
            "--app-version",
            "4.1.0",
            "--format",
            "json",
        ]);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/app")));
        assert_eq!(cli.app_version.as_deref(), Some("4.1.0"));
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn defaults_to_text_format_and_cwd() {
        let cli = Cli::parse_from(["readycheck"]);
        assert!(cli.root.is_none());
        assert_eq!(cli.format, Format::Text);
        assert!(!cli.no_color);
    }
}
