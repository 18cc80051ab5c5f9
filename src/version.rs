//! Version comparison and the interpreter-version threshold policy.
//!
//! Version strings in runtime output are rarely clean semver ("7.0", "v3.4",
//! "8.1.27-deb12"), so parsing is lenient: a leading `v` is stripped, the
//! numeric `major.minor.patch` prefix is taken, and missing segments are
//! padded with zeros. Pre-release ordering is deliberately not handled.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ReadycheckError, Result};

/// Minimum interpreter version for current application releases.
pub const REQUIRED_INTERPRETER_VERSION: &str = "7.0.8";

/// Minimum interpreter version for legacy (pre-4.0) application releases.
pub const LEGACY_REQUIRED_INTERPRETER_VERSION: &str = "5.5.9";

/// Interpreters below this version must configure a default timezone
/// explicitly; at or above it the configured zone is validated instead.
pub const TIMEZONE_DIRECTIVE_CUTOVER: &str = "7.0.0";

/// Name of the application's own entry in the dependency lock file.
pub const APP_PACKAGE_NAME: &str = "webapp/core";

/// Parse a version string leniently into a [`semver::Version`].
///
/// Strips a leading `v`, keeps only the numeric dotted prefix, and pads
/// to three segments ("7.0" compares as "7.0.0").
pub fn parse_lenient(value: &str) -> Result<semver::Version> {
    let trimmed = value.trim().trim_start_matches('v');

    // Keep the leading digits-and-dots run; drop "-deb12", "+build" etc.
    let numeric: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let numeric = numeric.trim_end_matches('.');

    let parts: Vec<&str> = numeric.split('.').filter(|p| !p.is_empty()).collect();
    let padded = match parts.len() {
        0 => {
            return Err(ReadycheckError::InvalidVersion {
                value: value.to_string(),
            })
        }
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => parts[..3].join("."),
    };

    semver::Version::parse(&padded).map_err(|_| ReadycheckError::InvalidVersion {
        value: value.to_string(),
    })
}

/// Inclusive `installed >= minimum` comparison on leniently parsed versions.
///
/// Unparseable input counts as not satisfying the minimum.
pub fn version_at_least(installed: &str, minimum: &str) -> bool {
    match (parse_lenient(installed), parse_lenient(minimum)) {
        (Ok(have), Ok(want)) => have >= want,
        _ => false,
    }
}

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").unwrap());

/// Extract the first `X.Y[.Z]` version from arbitrary command output.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_RE
        .captures(output)
        .map(|caps| caps[1].to_string())
}

/// Minimum interpreter version implied by a declared application version.
///
/// Application 4.0 dropped support for legacy interpreters; anything older
/// keeps the legacy floor.
pub fn minimum_for_app_version(app_version: &str) -> &'static str {
    match parse_lenient(app_version) {
        Ok(v) if v.major >= 4 => REQUIRED_INTERPRETER_VERSION,
        _ => LEGACY_REQUIRED_INTERPRETER_VERSION,
    }
}

#[derive(Debug, Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: Vec<LockPackage>,
}

#[derive(Debug, Deserialize)]
struct LockPackage {
    name: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: String,
}

/// The resolved version inputs for one evaluation run.
///
/// `app_version` is what the deployment declares it is running;
/// `minimum_interpreter` is the floor the mandatory version check compares
/// against.
#[derive(Debug, Clone)]
pub struct VersionPolicy {
    pub app_version: String,
    pub minimum_interpreter: String,
}

impl VersionPolicy {
    /// Resolve the policy for an install root.
    ///
    /// The application version comes from `explicit` when given, otherwise
    /// from `application.json` at the root. Neither being available is the
    /// one fatal setup error of the whole checker.
    ///
    /// The interpreter floor prefers the dependency lock file
    /// (`platform.lock`); a missing or unparseable lock falls back to the
    /// floor implied by the application version. Lock trouble is tolerated,
    /// never fatal.
    pub fn resolve(root: &Path, explicit: Option<&str>) -> Result<Self> {
        let app_version = match explicit {
            Some(v) => v.to_string(),
            None => declared_app_version(root).ok_or_else(|| {
                ReadycheckError::VersionDiscovery {
                    root: root.to_path_buf(),
                }
            })?,
        };

        let minimum = lock_derived_minimum(root)
            .unwrap_or_else(|| minimum_for_app_version(&app_version));

        Ok(Self {
            app_version,
            minimum_interpreter: minimum.to_string(),
        })
    }
}

/// Read the declared application version from `application.json`.
fn declared_app_version(root: &Path) -> Option<String> {
    let path = root.join("application.json");
    let raw = fs::read_to_string(&path).ok()?;
    let manifest: Manifest = serde_json::from_str(&raw)
        .map_err(|e| tracing::debug!("Unreadable manifest at {}: {}", path.display(), e))
        .ok()?;
    Some(manifest.version)
}

/// Derive the interpreter floor from the dependency lock file, if possible.
fn lock_derived_minimum(root: &Path) -> Option<&'static str> {
    let path = root.join("platform.lock");
    let raw = fs::read_to_string(&path).ok()?;
    let lock: LockFile = serde_json::from_str(&raw)
        .map_err(|e| tracing::debug!("Unreadable lock file at {}: {}", path.display(), e))
        .ok()?;

    let entry = lock.packages.iter().find(|p| p.name == APP_PACKAGE_NAME)?;
    Some(minimum_for_app_version(&entry.version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lenient_parse_pads_short_versions() {
        assert_eq!(parse_lenient("7.0").unwrap(), semver::Version::new(7, 0, 0));
        assert_eq!(parse_lenient("8").unwrap(), semver::Version::new(8, 0, 0));
    }

    #[test]
    fn lenient_parse_strips_prefix_and_suffix() {
        assert_eq!(
            parse_lenient("v3.4.2").unwrap(),
            semver::Version::new(3, 4, 2)
        );
        assert_eq!(
            parse_lenient("8.1.27-deb12u1").unwrap(),
            semver::Version::new(8, 1, 27)
        );
    }

    #[test]
    fn lenient_parse_rejects_garbage() {
        assert!(parse_lenient("not-a-version").is_err());
        assert!(parse_lenient("").is_err());
    }

    #[test]
    fn minimum_is_inclusive() {
        assert!(version_at_least("7.0.8", "7.0.8"));
        assert!(version_at_least("7.0.8", "5.5.9"));
        assert!(!version_at_least("7.0.8", "7.1.0"));
    }

    #[test]
    fn unparseable_installed_version_fails_minimum() {
        assert!(!version_at_least("unknown", "1.0.0"));
    }

    #[test]
    fn extract_version_finds_dotted_number() {
        assert_eq!(
            extract_version("webapp-runtime 7.4.33 (cli) built Jan 1"),
            Some("7.4.33".to_string())
        );
        assert_eq!(extract_version("ICU 72.1"), Some("72.1".to_string()));
        assert_eq!(extract_version("no digits here"), None);
    }

    #[test]
    fn app_major_four_requires_current_floor() {
        assert_eq!(minimum_for_app_version("4.0"), REQUIRED_INTERPRETER_VERSION);
        assert_eq!(
            minimum_for_app_version("3.4"),
            LEGACY_REQUIRED_INTERPRETER_VERSION
        );
    }

    #[test]
    fn explicit_version_wins_over_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("application.json"),
            r#"{"version": "3.4.0"}"#,
        )
        .unwrap();

        let policy = VersionPolicy::resolve(temp.path(), Some("4.1")).unwrap();
        assert_eq!(policy.app_version, "4.1");
        assert_eq!(policy.minimum_interpreter, REQUIRED_INTERPRETER_VERSION);
    }

    #[test]
    fn manifest_supplies_version_when_not_explicit() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("application.json"),
            r#"{"version": "3.4.0"}"#,
        )
        .unwrap();

        let policy = VersionPolicy::resolve(temp.path(), None).unwrap();
        assert_eq!(policy.app_version, "3.4.0");
        assert_eq!(
            policy.minimum_interpreter,
            LEGACY_REQUIRED_INTERPRETER_VERSION
        );
    }

    #[test]
    fn missing_version_everywhere_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = VersionPolicy::resolve(temp.path(), None).unwrap_err();
        assert!(matches!(
            err,
            crate::error::ReadycheckError::VersionDiscovery { .. }
        ));
    }

    #[test]
    fn lock_file_decides_interpreter_floor() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("platform.lock"),
            r#"{"packages": [{"name": "webapp/core", "version": "v4.2.0"}]}"#,
        )
        .unwrap();

        let policy = VersionPolicy::resolve(temp.path(), Some("3.4")).unwrap();
        assert_eq!(policy.minimum_interpreter, REQUIRED_INTERPRETER_VERSION);
    }

    #[test]
    fn legacy_lock_entry_keeps_legacy_floor() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("platform.lock"),
            r#"{"packages": [{"name": "webapp/core", "version": "v3.4.0"}]}"#,
        )
        .unwrap();

        let policy = VersionPolicy::resolve(temp.path(), Some("4.1")).unwrap();
        assert_eq!(
            policy.minimum_interpreter,
            LEGACY_REQUIRED_INTERPRETER_VERSION
        );
    }

    #[test]
    fn malformed_lock_file_is_tolerated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("platform.lock"), "{ this is not json").unwrap();

        let policy = VersionPolicy::resolve(temp.path(), Some("4.1")).unwrap();
        // Falls back to the app-version-derived floor.
        assert_eq!(policy.minimum_interpreter, REQUIRED_INTERPRETER_VERSION);
    }
}
