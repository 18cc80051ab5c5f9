//! A single testable condition.
//!
//! A `Requirement` is immutable once constructed: its outcome is computed
//! exactly once, from either a plain boolean (the caller evaluated the
//! predicate inline) or a directive check descriptor dispatched through
//! [`directive::evaluate`](super::directive::evaluate).

use crate::probe::RuntimeProbe;

use super::directive::{self, DirectiveCheck};

/// One checkable condition with its failure and remediation messages.
#[derive(Debug, Clone)]
pub struct Requirement {
    fulfilled: bool,
    test_message: String,
    help_html: String,
    help_console: Option<String>,
    directive: Option<String>,
}

impl Requirement {
    /// Build from an already-evaluated outcome.
    pub fn new(
        fulfilled: bool,
        test_message: impl Into<String>,
        help_html: impl Into<String>,
        help_console: Option<String>,
    ) -> Self {
        Self {
            fulfilled,
            test_message: test_message.into(),
            help_html: help_html.into(),
            help_console,
            directive: None,
        }
    }

    /// Build from a directive check, reading the runtime through `probe`
    /// now. The current directive value is a snapshot: the outcome never
    /// changes afterwards.
    pub fn from_directive(
        check: DirectiveCheck,
        probe: &dyn RuntimeProbe,
        test_message: impl Into<String>,
        help_html: impl Into<String>,
    ) -> Self {
        let fulfilled = directive::evaluate(&check, probe);
        Self {
            fulfilled,
            test_message: test_message.into(),
            help_html: help_html.into(),
            help_console: None,
            directive: Some(check.name),
        }
    }

    /// The precomputed outcome; stable across calls.
    pub fn is_fulfilled(&self) -> bool {
        self.fulfilled
    }

    /// Short description of what was checked.
    pub fn test_message(&self) -> &str {
        &self.test_message
    }

    /// Remediation text with markup, for the web surface.
    pub fn help_html(&self) -> &str {
        &self.help_html
    }

    /// Console-safe remediation text: the explicit override when present,
    /// otherwise the markup version with tags stripped.
    pub fn help_text(&self) -> String {
        match &self.help_console {
            Some(text) => text.clone(),
            None => strip_tags(&self.help_html),
        }
    }

    /// The configuration directive this requirement checked, if any.
    /// Drives the "edit the runtime configuration file" caveat.
    pub fn directive_name(&self) -> Option<&str> {
        self.directive.as_deref()
    }
}

/// Remove markup tags from remediation text for terminal display.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
