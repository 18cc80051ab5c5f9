//! Console rendering of an evaluation run.
//!
//! The report is a compact glyph stream (one glyph per check, in
//! evaluation order), a verdict banner, remediation sections for whatever
//! failed, and a closing note when a failed check points at the runtime
//! configuration file.

use std::io::Write;

use crate::error::{ReadycheckError, Result};
use crate::requirements::{Requirement, RequirementCollection};
use crate::version::VersionPolicy;

use super::theme::{CheckTheme, ReporterConfig};

/// Renders a [`RequirementCollection`] as a terminal report.
pub struct ConsoleReporter {
    config: ReporterConfig,
    theme: CheckTheme,
}

impl ConsoleReporter {
    pub fn new(config: ReporterConfig) -> Self {
        let theme = config.theme();
        Self { config, theme }
    }

    /// Write the full report to `out`.
    pub fn report(
        &self,
        out: &mut dyn Write,
        collection: &RequirementCollection,
        policy: &VersionPolicy,
    ) -> Result<()> {
        self.render(out, collection, policy)
            .map_err(ReadycheckError::Report)
    }

    fn render(
        &self,
        out: &mut dyn Write,
        collection: &RequirementCollection,
        policy: &VersionPolicy,
    ) -> std::io::Result<()> {
        self.title(out, "Environment Readiness Checker")?;

        writeln!(
            out,
            "> Checking requirements for version {}:",
            policy.app_version
        )?;
        writeln!(out)?;
        self.glyph_stream(out, collection)?;
        writeln!(out)?;
        writeln!(out)?;

        if collection.passed() {
            self.banner(
                out,
                &self.theme.success,
                "[OK]",
                "Your system is ready to run the application.",
            )?;
        } else {
            self.banner(
                out,
                &self.theme.error,
                "[ERROR]",
                "Your system is not ready to run the application.",
            )?;
            self.section(
                out,
                "Fix the following mandatory requirements",
                collection.failed_requirements(),
                &self.theme.error,
            )?;
        }

        if collection.failed_recommendations().next().is_some() {
            self.section(
                out,
                "Optional recommendations to improve your setup",
                collection.failed_recommendations(),
                &self.theme.warning,
            )?;
        }

        if collection.has_directive_issue() {
            writeln!(out)?;
            let note = "Note: the command line can use a different runtime configuration \
                        file than the one used by your web server. Re-run this check \
                        through the web server to be sure.";
            for line in textwrap::wrap(note, self.config.line_width) {
                writeln!(out, "{}", self.theme.dim.apply_to(line))?;
            }
        }

        Ok(())
    }

    /// Write one line per check, verdict first. Used for verbose output
    /// where the glyph stream alone is too terse.
    pub fn report_checks(
        &self,
        out: &mut dyn Write,
        collection: &RequirementCollection,
    ) -> Result<()> {
        self.render_checks(out, collection)
            .map_err(ReadycheckError::Report)
    }

    fn render_checks(
        &self,
        out: &mut dyn Write,
        collection: &RequirementCollection,
    ) -> std::io::Result<()> {
        for req in collection.mandatory() {
            let verdict = if req.is_fulfilled() {
                self.theme.success.apply_to(" ok ")
            } else {
                self.theme.error.apply_to("FAIL")
            };
            writeln!(out, " {}  {}", verdict, req.test_message())?;
        }
        for req in collection.recommended() {
            let verdict = if req.is_fulfilled() {
                self.theme.success.apply_to(" ok ")
            } else {
                self.theme.warning.apply_to("warn")
            };
            writeln!(out, " {}  {}", verdict, req.test_message())?;
        }
        writeln!(out)
    }

    fn title(&self, out: &mut dyn Write, text: &str) -> std::io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", self.theme.title.apply_to(text))?;
        writeln!(out, "{}", "~".repeat(text.chars().count()))?;
        writeln!(out)
    }

    /// One glyph per check: `.` passed, `E` failed requirement, `W` failed
    /// recommendation. Mandatory checks come first, matching build order.
    fn glyph_stream(
        &self,
        out: &mut dyn Write,
        collection: &RequirementCollection,
    ) -> std::io::Result<()> {
        for req in collection.mandatory() {
            if req.is_fulfilled() {
                write!(out, "{}", self.theme.success.apply_to("."))?;
            } else {
                write!(out, "{}", self.theme.error.apply_to("E"))?;
            }
        }
        for req in collection.recommended() {
            if req.is_fulfilled() {
                write!(out, "{}", self.theme.success.apply_to("."))?;
            } else {
                write!(out, "{}", self.theme.warning.apply_to("W"))?;
            }
        }
        Ok(())
    }

    fn banner(
        &self,
        out: &mut dyn Write,
        style: &console::Style,
        tag: &str,
        text: &str,
    ) -> std::io::Result<()> {
        let line = format!("{} {}", tag, text);
        let pad = " ".repeat(line.chars().count() + 2);
        writeln!(out, "{}", style.apply_to(&pad))?;
        writeln!(out, "{}", style.apply_to(format!(" {} ", line)))?;
        writeln!(out, "{}", style.apply_to(&pad))?;
        writeln!(out)
    }

    fn section<'a>(
        &self,
        out: &mut dyn Write,
        heading: &str,
        items: impl Iterator<Item = &'a Requirement>,
        style: &console::Style,
    ) -> std::io::Result<()> {
        writeln!(out, "{}", self.theme.title.apply_to(heading))?;
        writeln!(out, "{}", "-".repeat(heading.chars().count()))?;
        for req in items {
            writeln!(out)?;
            writeln!(out, " {} {}", style.apply_to("*"), req.test_message())?;
            let help = req.help_text();
            let wrapped = textwrap::wrap(
                &help,
                textwrap::Options::new(self.config.line_width)
                    .initial_indent("   > ")
                    .subsequent_indent("     "),
            );
            for line in wrapped {
                writeln!(out, "{}", self.theme.dim.apply_to(line))?;
            }
        }
        writeln!(out)
    }
}
