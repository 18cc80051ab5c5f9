//! End-to-end evaluation scenarios against the library API.
//!
//! Each scenario starts from a healthy environment and breaks exactly one
//! thing, then asserts the verdict and the rendered report together.

use std::fs;

use readycheck::paths::PathLayout;
use readycheck::probe::MockProbe;
use readycheck::report::{ConsoleReporter, ReporterConfig};
use readycheck::requirements::RequirementSetBuilder;
use readycheck::version::VersionPolicy;
use tempfile::TempDir;

fn install_root() -> (TempDir, PathLayout) {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("var/cache")).unwrap();
    fs::create_dir_all(temp.path().join("var/log")).unwrap();
    fs::create_dir_all(temp.path().join("vendor")).unwrap();
    let layout = PathLayout::resolve(temp.path());
    (temp, layout)
}

fn policy() -> VersionPolicy {
    VersionPolicy {
        app_version: "4.1.0".to_string(),
        minimum_interpreter: "7.0.8".to_string(),
    }
}

fn render(layout: &PathLayout, probe: &MockProbe) -> (bool, String) {
    let collection = RequirementSetBuilder::build(layout, &policy(), probe);
    let reporter = ConsoleReporter::new(ReporterConfig::new(false));
    let mut buf = Vec::new();
    reporter
        .report(&mut buf, &collection, &policy())
        .unwrap();
    (collection.passed(), String::from_utf8(buf).unwrap())
}

#[test]
fn healthy_environment_reports_ok() {
    let (_temp, layout) = install_root();
    let probe = MockProbe::healthy();

    let (passed, output) = render(&layout, &probe);
    assert!(passed);
    assert!(output.contains("[OK]"));
    assert!(!output.contains("[ERROR]"));
    assert!(!output.contains("Optional recommendations"));
}

#[test]
fn outdated_interpreter_fails_the_run() {
    let (_temp, layout) = install_root();
    let mut probe = MockProbe::healthy();
    probe.interpreter_version = Some("5.5.0".to_string());

    let (passed, output) = render(&layout, &probe);
    assert!(!passed);
    assert!(output.contains("[ERROR]"));
    assert!(output.contains("5.5.0"));
    assert!(output.contains("7.0.8"));
}

#[test]
fn missing_accelerator_passes_with_recommendation() {
    let (_temp, layout) = install_root();
    let probe = MockProbe::healthy().without_capability("accelerator");

    let (passed, output) = render(&layout, &probe);
    assert!(passed);
    assert!(output.contains("[OK]"));
    assert!(output.contains("Optional recommendations"));
    assert!(output.contains("accelerator"));
}

#[test]
fn unwritable_cache_directory_is_named_in_the_report() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("var")).unwrap();
    fs::create_dir_all(temp.path().join("vendor")).unwrap();
    let layout = PathLayout::resolve(temp.path());
    let probe = MockProbe::healthy();

    let (passed, output) = render(&layout, &probe);
    assert!(!passed);
    let cache = temp.path().join("var/cache");
    assert!(output.contains(&cache.display().to_string()));
}

#[test]
fn unknown_timezone_is_named_in_the_report() {
    let (_temp, layout) = install_root();
    let mut probe = MockProbe::healthy();
    probe.default_timezone = Some("Atlantis/Central".to_string());

    let (passed, output) = render(&layout, &probe);
    assert!(!passed);
    assert!(output.contains("Atlantis/Central"));
}

#[test]
fn directive_failure_triggers_config_file_note() {
    let (_temp, layout) = install_root();
    let probe = MockProbe::healthy().with_directive("short_open_tag", "on");

    let (passed, output) = render(&layout, &probe);
    assert!(passed);
    assert!(output.contains("short_open_tag"));
    assert!(output.contains("different runtime configuration"));
}

#[test]
fn web_surface_serves_the_same_verdict_to_localhost_only() {
    use std::net::{IpAddr, Ipv4Addr};

    let (_temp, layout) = install_root();
    let probe = MockProbe::healthy().without_capability("json");
    let collection = RequirementSetBuilder::build(&layout, &policy(), &probe);

    let outcome =
        readycheck::web::respond(IpAddr::V4(Ipv4Addr::LOCALHOST), &collection).unwrap();
    assert!(!outcome.passed);
    assert!(outcome
        .failed_requirements
        .iter()
        .any(|f| f.message.contains("json")));

    let refused =
        readycheck::web::respond(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1)), &collection);
    assert!(refused.is_err());
}
