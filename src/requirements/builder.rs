//! The concrete requirement set for one evaluation run.
//!
//! `RequirementSetBuilder` is pure policy: given a resolved path layout,
//! the version policy for the deployment, and a runtime probe, it appends
//! every mandatory requirement and recommendation the application cares
//! about. It owns no state of its own and everything is evaluated inline
//! at append time.
//!
//! Collaborator gaps (unresolvable path, absent optional capability) skip
//! only the dependent checks; the rest of the set is still produced.

use std::collections::BTreeSet;

use crate::paths::{is_writable_dir, PathLayout};
use crate::probe::RuntimeProbe;
use crate::version::{version_at_least, VersionPolicy, TIMEZONE_DIRECTIVE_CUTOVER};

use super::collection::RequirementCollection;
use super::directive::{parse_bool, ExpectedValue};

/// Capabilities the application cannot run without, with the human label
/// used in remediation text.
const REQUIRED_CAPABILITIES: &[(&str, &str)] = &[
    ("charset", "charset conversion"),
    ("json", "JSON encoding"),
    ("session", "session handling"),
    ("lexer", "template lexer"),
    ("xml", "XML parsing"),
];

/// Minimum accelerator version known to work with the application's cache
/// invalidation.
const MIN_ACCELERATOR_VERSION: &str = "3.1.13";

/// Directives that no longer exist on modern runtimes. Only checked when
/// the runtime still reports them.
const LEGACY_DIRECTIVES: &[&str] = &["magic_quotes", "register_globals"];

/// Assembles the mandatory and recommended requirement sets.
pub struct RequirementSetBuilder<'a> {
    layout: &'a PathLayout,
    policy: &'a VersionPolicy,
    probe: &'a dyn RuntimeProbe,
    collection: RequirementCollection,
}

impl<'a> RequirementSetBuilder<'a> {
    /// Build the full requirement collection for one run.
    pub fn build(
        layout: &'a PathLayout,
        policy: &'a VersionPolicy,
        probe: &'a dyn RuntimeProbe,
    ) -> RequirementCollection {
        let mut builder = Self {
            layout,
            policy,
            probe,
            collection: RequirementCollection::new(),
        };
        builder.set_requirements();
        builder.set_recommendations();

        tracing::debug!(
            "Built {} mandatory requirements and {} recommendations",
            builder.collection.mandatory().len(),
            builder.collection.recommended().len()
        );
        builder.collection
    }

    /// Mandatory requirements.
    fn set_requirements(&mut self) {
        let installed = self.probe.interpreter_version();
        let minimum = self.policy.minimum_interpreter.clone();

        match &installed {
            Some(version) => self.collection.add_requirement_with_console_help(
                version_at_least(version, &minimum),
                format!(
                    "Interpreter version must be at least {} ({} installed)",
                    minimum, version
                ),
                format!(
                    "You are running interpreter version \"<strong>{}</strong>\", but the \
                     application needs at least \"<strong>{}</strong>\" to run. Upgrade your \
                     runtime, preferably to the latest version.",
                    version, minimum
                ),
                format!(
                    "Install interpreter {} or newer (installed version is {})",
                    minimum, version
                ),
            ),
            None => self.collection.add_requirement(
                false,
                format!(
                    "Interpreter version must be at least {} (installed version unknown)",
                    minimum
                ),
                "The interpreter version could not be determined. Make sure the runtime \
                 binary is on PATH or pin <strong>runtime.version</strong> in the runtime \
                 configuration file.",
            ),
        }

        self.collection.add_requirement(
            self.layout.vendor.is_dir(),
            "Vendor libraries must be installed",
            "Vendor libraries are missing. Run \"<strong>deps install</strong>\" from the \
             install root to install them.",
        );

        if let Some(cache) = &self.layout.cache {
            self.collection.add_requirement(
                is_writable_dir(cache),
                format!("{} directory must be writable", cache.display()),
                format!(
                    "Change the permissions of \"<strong>{}</strong>\" directory so that \
                     the web server can write into it.",
                    cache.display()
                ),
            );
        }

        if let Some(logs) = &self.layout.logs {
            self.collection.add_requirement(
                is_writable_dir(logs),
                format!("{} directory must be writable", logs.display()),
                format!(
                    "Change the permissions of \"<strong>{}</strong>\" directory so that \
                     the web server can write into it.",
                    logs.display()
                ),
            );
        }

        self.timezone_requirements(installed.as_deref());

        for (name, label) in REQUIRED_CAPABILITIES {
            self.collection.add_requirement(
                self.probe.capability_available(name),
                format!("Capability \"{}\" must be available", name),
                format!("Install and enable <strong>{}</strong> support.", label),
            );
        }

        if self.probe.capability_available("accelerator")
            && self.directive_truthy("accelerator.enabled")
        {
            let fulfilled = self
                .probe
                .capability_version("accelerator")
                .is_some_and(|v| version_at_least(&v, MIN_ACCELERATOR_VERSION));
            self.collection.add_requirement(
                fulfilled,
                format!(
                    "Accelerator version must be at least {}",
                    MIN_ACCELERATOR_VERSION
                ),
                format!(
                    "Upgrade your <strong>accelerator</strong> extension ({}+).",
                    MIN_ACCELERATOR_VERSION
                ),
            );
        }

        self.collection.add_directive_requirement(
            self.probe,
            "detect_unicode",
            ExpectedValue::flag(false),
            false,
            "detect_unicode must be disabled",
            "Set \"<strong>detect_unicode</strong>\" to <strong>off</strong> in the runtime \
             configuration file<a href=\"#runtime-ini\">*</a>.",
        );

        if self.probe.capability_available("debugger") {
            self.collection.add_directive_requirement(
                self.probe,
                "debug.show_exception_trace",
                ExpectedValue::flag(false),
                true,
                "debug.show_exception_trace must be disabled",
                "Set \"<strong>debug.show_exception_trace</strong>\" to <strong>off</strong> \
                 in the runtime configuration file<a href=\"#runtime-ini\">*</a>.",
            );

            self.collection.add_directive_requirement(
                self.probe,
                "debug.scream",
                ExpectedValue::flag(false),
                true,
                "debug.scream must be disabled",
                "Set \"<strong>debug.scream</strong>\" to <strong>off</strong> in the \
                 runtime configuration file<a href=\"#runtime-ini\">*</a>.",
            );

            self.collection.add_directive_recommendation(
                self.probe,
                "debug.max_nesting_level",
                ExpectedValue::predicate(|v| v.parse::<i64>().is_ok_and(|n| n >= 500)),
                true,
                "debug.max_nesting_level should be at least 500",
                "Set \"<strong>debug.max_nesting_level</strong>\" to e.g. \
                 \"<strong>500</strong>\" in the runtime configuration file\
                 <a href=\"#runtime-ini\">*</a> to stop the debugger's infinite recursion \
                 protection erroneously aborting deep template renders.",
            );
        }

        self.collection.add_requirement(
            self.probe.capability_available("regex"),
            "Regex engine must be available",
            "Install the <strong>regex</strong> engine (version 8.0+).",
        );

        if self.probe.capability_available("multibyte") {
            self.collection.add_directive_requirement(
                self.probe,
                "multibyte.func_overload",
                ExpectedValue::predicate(|v| v.parse::<i64>().is_ok_and(|n| n == 0)),
                true,
                "string functions must not be overloaded",
                "Set \"<strong>multibyte.func_overload</strong>\" to <strong>0</strong> in \
                 the runtime configuration file<a href=\"#runtime-ini\">*</a> to disable \
                 function overloading by the multibyte extension.",
            );
        }
    }

    /// The timezone rules straddle an interpreter cutover: old interpreters
    /// must set the directive explicitly; newer ones get their configured
    /// zone validated against the platform timezone database.
    fn timezone_requirements(&mut self, installed: Option<&str>) {
        let Some(version) = installed else {
            // Interpreter unknown: the version requirement above already
            // failed; skip the dependent timezone checks.
            return;
        };

        if !version_at_least(version, TIMEZONE_DIRECTIVE_CUTOVER) {
            // Any non-empty value counts as set; the zone itself is only
            // validated on newer interpreters below.
            self.collection.add_directive_requirement(
                self.probe,
                "date.timezone",
                ExpectedValue::predicate(|v| !v.trim().is_empty()),
                false,
                "date.timezone setting must be set",
                "Set the \"<strong>date.timezone</strong>\" setting in the runtime \
                 configuration file<a href=\"#runtime-ini\">*</a> (like Europe/Paris).",
            );
        }

        if version_at_least(version, &self.policy.minimum_interpreter) {
            let Some(configured) = self.probe.default_timezone() else {
                return;
            };

            let known: BTreeSet<String> = self
                .probe
                .timezone_table()
                .into_values()
                .flatten()
                .collect();

            self.collection.add_requirement(
                known.contains(&configured),
                format!(
                    "Configured default timezone \"{}\" must be supported by the platform",
                    configured
                ),
                "Your default timezone is not known to the platform timezone database. \
                 Check for typos in your runtime configuration file and have a look at \
                 the list of deprecated timezone names.",
            );
        }
    }

    /// Optional recommendations.
    fn set_recommendations(&mut self) {
        self.collection.add_recommendation(
            self.probe.ca_bundle_path().is_some(),
            "System TLS/SSL CA root bundle should be installed",
            "Outbound TLS connections will fall back to bundled certificates that are \
             only refreshed on dependency updates. It is strongly recommended that you, \
             or your hosting provider, correctly set up a system-wide CA root bundle.",
        );

        if let Some(version) = self.probe.capability_version("regex") {
            self.collection.add_recommendation(
                version_at_least(&version, "8.0"),
                format!(
                    "Regex engine should be at least version 8.0 ({} installed)",
                    version
                ),
                "<strong>Regex engine 8.0+</strong> has been bundled with the runtime for \
                 years; you are using an outdated build. The application probably works \
                 anyway but upgrading is recommended.",
            );
        }

        self.collection.add_recommendation(
            self.probe.capability_available("dom"),
            "DOM and XML tree support should be installed",
            "Install and enable the <strong>DOM</strong> and <strong>XML</strong> modules.",
        );

        self.collection.add_recommendation(
            self.probe.capability_available("multibyte"),
            "Multibyte string support should be available",
            "Install and enable the <strong>multibyte</strong> extension.",
        );

        self.collection.add_recommendation(
            self.probe.capability_available("charset"),
            "Charset conversion support should be available",
            "Install and enable the <strong>charset</strong> extension.",
        );

        self.collection.add_recommendation(
            self.probe.capability_available("unicode"),
            "UTF-8 transcoding support should be available",
            "Install and enable the <strong>XML</strong> extension.",
        );

        self.collection.add_recommendation(
            self.probe.capability_available("filter"),
            "Input filtering support should be available",
            "Install and enable the <strong>filter</strong> extension.",
        );

        // Meaningless on Windows: no POSIX terminal introspection there.
        if !self.probe.on_windows() {
            self.collection.add_recommendation(
                self.probe.capability_available("isatty"),
                "Terminal detection (isatty) should be available",
                "Install and enable the <strong>posix</strong> extension (used to \
                 colorize the CLI output).",
            );
        }

        self.intl_recommendations();

        let accelerated = self.probe.capability_available("accelerator")
            && self.directive_truthy("accelerator.enabled");
        self.collection.add_recommendation(
            accelerated,
            "An opcode accelerator should be installed for optimum performance",
            "Install and/or enable an <strong>opcode accelerator</strong> \
             (highly recommended).",
        );

        if accelerated {
            self.collection.add_directive_recommendation(
                self.probe,
                "accelerator.memory_limit",
                ExpectedValue::predicate(|v| {
                    super::directive::parse_bytes(v).is_some_and(|b| b >= 16 * 1024 * 1024)
                }),
                true,
                "accelerator.memory_limit should be at least 16M",
                "Raise \"<strong>accelerator.memory_limit</strong>\" to at least \
                 \"<strong>16M</strong>\" in the runtime configuration file\
                 <a href=\"#runtime-ini\">*</a> so the opcode cache holds the whole \
                 application.",
            );
        }

        if self.probe.on_windows() {
            self.collection.add_directive_recommendation(
                self.probe,
                "realpath_cache_size",
                ExpectedValue::predicate(|v| {
                    super::directive::parse_bytes(v).is_some_and(|b| b >= 5 * 1024 * 1024)
                }),
                false,
                "realpath_cache_size should be at least 5M",
                "Setting \"<strong>realpath_cache_size</strong>\" to e.g. \
                 \"<strong>5242880</strong>\" or \"<strong>5M</strong>\" in the runtime \
                 configuration file<a href=\"#runtime-ini\">*</a> may improve performance \
                 on Windows significantly in some cases.",
            );
        }

        self.collection.add_directive_recommendation(
            self.probe,
            "short_open_tag",
            ExpectedValue::flag(false),
            false,
            "short_open_tag should be disabled",
            "Set \"<strong>short_open_tag</strong>\" to <strong>off</strong> in the \
             runtime configuration file<a href=\"#runtime-ini\">*</a>.",
        );

        self.collection.add_directive_recommendation(
            self.probe,
            "session.auto_start",
            ExpectedValue::flag(false),
            false,
            "session.auto_start should be disabled",
            "Set \"<strong>session.auto_start</strong>\" to <strong>off</strong> in the \
             runtime configuration file<a href=\"#runtime-ini\">*</a>.",
        );

        // Gone from modern runtimes; only meaningful where they still exist.
        for name in LEGACY_DIRECTIVES {
            if self.probe.read_directive(name).is_some() {
                self.collection.add_directive_recommendation(
                    self.probe,
                    *name,
                    ExpectedValue::flag(false),
                    true,
                    format!("{} should be disabled", name),
                    format!(
                        "Set \"<strong>{}</strong>\" to <strong>off</strong> in the \
                         runtime configuration file<a href=\"#runtime-ini\">*</a>.",
                        name
                    ),
                );
            }
        }

        self.collection.add_recommendation(
            self.probe.capability_available("persistence"),
            "Persistence layer should be installed",
            "Install <strong>persistence</strong> support (mandatory for the database \
             layer).",
        );

        if self.probe.capability_available("persistence") {
            let drivers = self.probe.persistence_drivers();
            let listing = if drivers.is_empty() {
                "none".to_string()
            } else {
                drivers.join(", ")
            };
            self.collection.add_recommendation(
                !drivers.is_empty(),
                format!(
                    "Persistence layer should have some drivers installed \
                     (currently available: {})",
                    listing
                ),
                "Install <strong>persistence drivers</strong> (mandatory for the \
                 database layer).",
            );
        }
    }

    /// Internationalization checks only make sense when intl is present at
    /// all; its absence is itself just one failed recommendation.
    fn intl_recommendations(&mut self) {
        let available = self.probe.capability_available("intl");
        self.collection.add_recommendation(
            available,
            "Internationalization (intl) support should be available",
            "Install and enable the <strong>intl</strong> extension (used for \
             validators).",
        );
        if !available {
            return;
        }

        // Some builds ship intl with a broken collation backend.
        self.collection.add_recommendation(
            self.probe.capability_available("intl/collator"),
            "intl support should be correctly configured",
            "The intl support does not behave properly: constructing a collator for a \
             well-known locale failed. This problem is typical of broken vendor builds.",
        );

        if let Some(icu) = self.probe.capability_version("icu") {
            self.collection.add_recommendation(
                version_at_least(&icu, "4.0"),
                "intl ICU version should be at least 4+",
                "Upgrade your <strong>intl</strong> support with a newer ICU version (4+).",
            );
        }

        self.collection.add_directive_recommendation(
            self.probe,
            "intl.error_level",
            ExpectedValue::predicate(|v| v.parse::<i64>().is_ok_and(|n| n == 0)),
            true,
            "intl.error_level should be 0 in the runtime configuration",
            "Set \"<strong>intl.error_level</strong>\" to \"<strong>0</strong>\" in the \
             runtime configuration file<a href=\"#runtime-ini\">*</a> to inhibit messages \
             when an error occurs in ICU functions.",
        );
    }

    /// Ini-style truthiness of a directive; unset counts as off.
    fn directive_truthy(&self, name: &str) -> bool {
        self.probe
            .read_directive(name)
            .is_some_and(|v| parse_bool(&v))
    }
}
