//! In-memory probe for tests.
//!
//! `MockProbe` answers every [`RuntimeProbe`](super::RuntimeProbe) query
//! from plain fields, so builder and reporter behavior can be pinned down
//! without touching the host environment.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::RuntimeProbe;

/// A fully scriptable probe.
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    pub interpreter_version: Option<String>,
    pub capabilities: BTreeSet<String>,
    pub capability_versions: BTreeMap<String, String>,
    pub directives: BTreeMap<String, String>,
    pub default_timezone: Option<String>,
    pub timezone_table: BTreeMap<String, Vec<String>>,
    pub drivers: Vec<String>,
    pub ca_bundle: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub windows: bool,
}

impl MockProbe {
    /// A probe describing an environment that satisfies every mandatory
    /// requirement and every recommendation. Tests start from this and
    /// break one thing at a time.
    pub fn healthy() -> Self {
        let mut probe = Self {
            interpreter_version: Some("7.4.33".to_string()),
            default_timezone: Some("Europe/Paris".to_string()),
            drivers: vec!["pgsql".to_string(), "sqlite".to_string()],
            ca_bundle: Some(PathBuf::from("/etc/ssl/certs/ca-certificates.crt")),
            config_file: Some(PathBuf::from("/srv/app/config/runtime.ini")),
            ..Self::default()
        };

        for cap in [
            "charset",
            "json",
            "session",
            "lexer",
            "xml",
            "regex",
            "dom",
            "multibyte",
            "unicode",
            "filter",
            "isatty",
            "intl",
            "intl/collator",
            "accelerator",
            "persistence",
        ] {
            probe.capabilities.insert(cap.to_string());
        }

        probe
            .capability_versions
            .insert("regex".to_string(), "10.42".to_string());
        probe
            .capability_versions
            .insert("icu".to_string(), "72.1".to_string());
        probe
            .capability_versions
            .insert("accelerator".to_string(), "8.2.0".to_string());

        probe
            .directives
            .insert("accelerator.enabled".to_string(), "1".to_string());
        probe
            .timezone_table
            .insert("CET".to_string(), vec!["Europe/Paris".to_string()]);
        probe.timezone_table.insert(
            "EST".to_string(),
            vec!["America/New_York".to_string()],
        );

        probe
    }

    /// Set a directive value, builder style.
    pub fn with_directive(mut self, name: &str, value: &str) -> Self {
        self.directives.insert(name.to_string(), value.to_string());
        self
    }

    /// Remove a capability, builder style.
    pub fn without_capability(mut self, name: &str) -> Self {
        self.capabilities.remove(name);
        self
    }
}

impl RuntimeProbe for MockProbe {
    fn interpreter_version(&self) -> Option<String> {
        self.interpreter_version.clone()
    }

    fn capability_available(&self, name: &str) -> bool {
        self.capabilities.contains(name)
    }

    fn capability_version(&self, name: &str) -> Option<String> {
        self.capability_versions.get(name).cloned()
    }

    fn read_directive(&self, name: &str) -> Option<String> {
        self.directives.get(name).cloned()
    }

    fn default_timezone(&self) -> Option<String> {
        self.default_timezone.clone()
    }

    fn timezone_table(&self) -> BTreeMap<String, Vec<String>> {
        self.timezone_table.clone()
    }

    fn persistence_drivers(&self) -> Vec<String> {
        self.drivers.clone()
    }

    fn ca_bundle_path(&self) -> Option<PathBuf> {
        self.ca_bundle.clone()
    }

    fn config_file_path(&self) -> Option<PathBuf> {
        self.config_file.clone()
    }

    fn on_windows(&self) -> bool {
        self.windows
    }
}
