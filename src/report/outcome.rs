//! Machine-readable evaluation summary.

use std::path::PathBuf;

use serde::Serialize;

use crate::requirements::{Requirement, RequirementCollection};

/// One failed check, flattened for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct FailedItem {
    pub message: String,
    pub help: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<String>,
}

impl From<&Requirement> for FailedItem {
    fn from(req: &Requirement) -> Self {
        Self {
            message: req.test_message().to_string(),
            help: req.help_text(),
            directive: req.directive_name().map(str::to_string),
        }
    }
}

/// The verdict of one evaluation run, for `--format json` and the web
/// surface.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub failed_requirements: Vec<FailedItem>,
    pub failed_recommendations: Vec<FailedItem>,
    pub needs_config_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

impl CheckOutcome {
    pub fn from_collection(
        collection: &RequirementCollection,
        config_file: Option<PathBuf>,
    ) -> Self {
        Self {
            passed: collection.passed(),
            failed_requirements: collection.failed_requirements().map(Into::into).collect(),
            failed_recommendations: collection
                .failed_recommendations()
                .map(Into::into)
                .collect(),
            needs_config_edit: collection.has_directive_issue(),
            config_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MockProbe;
    use crate::requirements::ExpectedValue;

    #[test]
    fn outcome_reflects_collection_state() {
        let mut collection = RequirementCollection::new();
        collection.add_requirement(true, "ok", "h");
        collection.add_requirement(false, "bad", "Fix <strong>it</strong>.");
        collection.add_recommendation(false, "meh", "h");

        let outcome = CheckOutcome::from_collection(&collection, None);
        assert!(!outcome.passed);
        assert_eq!(outcome.failed_requirements.len(), 1);
        assert_eq!(outcome.failed_requirements[0].message, "bad");
        assert_eq!(outcome.failed_requirements[0].help, "Fix it.");
        assert_eq!(outcome.failed_recommendations.len(), 1);
        assert!(!outcome.needs_config_edit);
    }

    #[test]
    fn directive_failures_set_config_edit_flag() {
        let probe = MockProbe::default().with_directive("short_open_tag", "1");
        let mut collection = RequirementCollection::new();
        collection.add_directive_recommendation(
            &probe,
            "short_open_tag",
            ExpectedValue::flag(false),
            false,
            "should be off",
            "h",
        );

        let outcome = CheckOutcome::from_collection(
            &collection,
            Some(PathBuf::from("/etc/runtime.ini")),
        );
        assert!(outcome.needs_config_edit);
        assert_eq!(
            outcome.failed_recommendations[0].directive.as_deref(),
            Some("short_open_tag")
        );
    }

    #[test]
    fn serializes_to_stable_json_shape() {
        let mut collection = RequirementCollection::new();
        collection.add_requirement(true, "ok", "h");

        let outcome = CheckOutcome::from_collection(&collection, None);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["passed"], true);
        assert!(json["failed_requirements"].as_array().unwrap().is_empty());
        // Absent config file is omitted entirely.
        assert!(json.get("config_file").is_none());
    }
}
