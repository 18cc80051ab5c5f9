//! Ordered, two-tier requirement container.
//!
//! Requirements are appended to exactly one of two tiers — mandatory or
//! recommended — and never removed, reordered, or promoted. The console
//! report renders one glyph per requirement in insertion order, so order
//! is part of the contract.

use crate::probe::RuntimeProbe;

use super::directive::{DirectiveCheck, ExpectedValue};
use super::requirement::Requirement;

/// Append-only collection partitioning requirements into mandatory and
/// recommended tiers.
#[derive(Debug, Default)]
pub struct RequirementCollection {
    mandatory: Vec<Requirement>,
    recommended: Vec<Requirement>,
}

impl RequirementCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mandatory requirement from an already-evaluated outcome.
    pub fn add_requirement(
        &mut self,
        fulfilled: bool,
        test_message: impl Into<String>,
        help_html: impl Into<String>,
    ) {
        self.mandatory
            .push(Requirement::new(fulfilled, test_message, help_html, None));
    }

    /// Append a mandatory requirement with a console-specific help text.
    pub fn add_requirement_with_console_help(
        &mut self,
        fulfilled: bool,
        test_message: impl Into<String>,
        help_html: impl Into<String>,
        help_console: impl Into<String>,
    ) {
        self.mandatory.push(Requirement::new(
            fulfilled,
            test_message,
            help_html,
            Some(help_console.into()),
        ));
    }

    /// Append a recommendation from an already-evaluated outcome.
    pub fn add_recommendation(
        &mut self,
        fulfilled: bool,
        test_message: impl Into<String>,
        help_html: impl Into<String>,
    ) {
        self.recommended
            .push(Requirement::new(fulfilled, test_message, help_html, None));
    }

    /// Evaluate a directive check now (snapshot read through `probe`) and
    /// append it as mandatory.
    pub fn add_directive_requirement(
        &mut self,
        probe: &dyn RuntimeProbe,
        name: impl Into<String>,
        expected: ExpectedValue,
        approximate: bool,
        test_message: impl Into<String>,
        help_html: impl Into<String>,
    ) {
        self.mandatory.push(Requirement::from_directive(
            DirectiveCheck::new(name, expected, approximate),
            probe,
            test_message,
            help_html,
        ));
    }

    /// Evaluate a directive check now and append it as a recommendation.
    pub fn add_directive_recommendation(
        &mut self,
        probe: &dyn RuntimeProbe,
        name: impl Into<String>,
        expected: ExpectedValue,
        approximate: bool,
        test_message: impl Into<String>,
        help_html: impl Into<String>,
    ) {
        self.recommended.push(Requirement::from_directive(
            DirectiveCheck::new(name, expected, approximate),
            probe,
            test_message,
            help_html,
        ));
    }

    /// The mandatory tier, in insertion order.
    pub fn mandatory(&self) -> &[Requirement] {
        &self.mandatory
    }

    /// The recommended tier, in insertion order.
    pub fn recommended(&self) -> &[Requirement] {
        &self.recommended
    }

    /// All requirements: mandatory then recommended, each in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Requirement> {
        self.mandatory.iter().chain(self.recommended.iter())
    }

    /// Mandatory requirements that failed, in insertion order.
    pub fn failed_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.mandatory.iter().filter(|r| !r.is_fulfilled())
    }

    /// Recommendations that failed, in insertion order.
    pub fn failed_recommendations(&self) -> impl Iterator<Item = &Requirement> {
        self.recommended.iter().filter(|r| !r.is_fulfilled())
    }

    /// Whether every mandatory requirement passed.
    pub fn passed(&self) -> bool {
        self.failed_requirements().next().is_none()
    }

    /// Whether any failed item, in either tier, came from a configuration
    /// directive check (and therefore needs a config-file edit to fix).
    pub fn has_directive_issue(&self) -> bool {
        self.failed_requirements()
            .chain(self.failed_recommendations())
            .any(|r| r.directive_name().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MockProbe;

    #[test]
    fn all_concatenates_tiers_in_order() {
        let mut collection = RequirementCollection::new();
        collection.add_requirement(true, "m1", "h");
        collection.add_recommendation(true, "r1", "h");
        collection.add_requirement(false, "m2", "h");
        collection.add_recommendation(false, "r2", "h");

        let messages: Vec<&str> = collection.all().map(|r| r.test_message()).collect();
        assert_eq!(messages, vec!["m1", "m2", "r1", "r2"]);
        assert_eq!(
            collection.all().count(),
            collection.mandatory().len() + collection.recommended().len()
        );
    }

    #[test]
    fn failed_views_filter_and_preserve_order() {
        let mut collection = RequirementCollection::new();
        collection.add_requirement(false, "m1", "h");
        collection.add_requirement(true, "m2", "h");
        collection.add_requirement(false, "m3", "h");
        collection.add_recommendation(false, "r1", "h");
        collection.add_recommendation(true, "r2", "h");

        let failed: Vec<&str> = collection
            .failed_requirements()
            .map(|r| r.test_message())
            .collect();
        assert_eq!(failed, vec!["m1", "m3"]);

        let failed_recs: Vec<&str> = collection
            .failed_recommendations()
            .map(|r| r.test_message())
            .collect();
        assert_eq!(failed_recs, vec!["r1"]);
    }

    #[test]
    fn passed_only_considers_mandatory_tier() {
        let mut collection = RequirementCollection::new();
        collection.add_requirement(true, "m1", "h");
        collection.add_recommendation(false, "r1", "h");
        assert!(collection.passed());

        collection.add_requirement(false, "m2", "h");
        assert!(!collection.passed());
    }

    #[test]
    fn directive_issue_flag_tracks_failed_directive_checks() {
        let probe = MockProbe::default().with_directive("short_open_tag", "1");

        let mut collection = RequirementCollection::new();
        collection.add_requirement(false, "plain failure", "h");
        assert!(!collection.has_directive_issue());

        collection.add_directive_recommendation(
            &probe,
            "short_open_tag",
            ExpectedValue::flag(false),
            false,
            "short_open_tag should be off",
            "h",
        );
        assert!(collection.has_directive_issue());
    }

    #[test]
    fn fulfilled_directive_check_raises_no_caveat() {
        let probe = MockProbe::default().with_directive("short_open_tag", "0");

        let mut collection = RequirementCollection::new();
        collection.add_directive_requirement(
            &probe,
            "short_open_tag",
            ExpectedValue::flag(false),
            false,
            "short_open_tag must be off",
            "h",
        );
        assert!(collection.passed());
        assert!(!collection.has_directive_issue());
    }

    #[test]
    fn empty_collection_passes() {
        let collection = RequirementCollection::new();
        assert!(collection.passed());
        assert_eq!(collection.all().count(), 0);
    }
}
