//! The real runtime probe.
//!
//! `SystemProbe` answers introspection queries from three sources:
//!
//! 1. The runtime configuration file (`runtime.ini` under the resolved
//!    config directory, overridable via `READYCHECK_RUNTIME_INI`), parsed
//!    as INI-style `key = value` pairs with `[section]` headers folded into
//!    dotted keys.
//! 2. The interpreter binary itself, resolved on PATH and asked for
//!    `--version` (pinned deployments can skip the subprocess by setting
//!    the `runtime.version` directive).
//! 3. The host platform: timezone database, PATH scan for driver client
//!    binaries, well-known CA bundle locations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{NaiveDate, Offset, TimeZone};
use chrono_tz::{OffsetName, TZ_VARIANTS};

use crate::paths::PathLayout;
use crate::version::extract_version;

use super::RuntimeProbe;

/// Default name of the interpreter binary when the config does not pin one.
const DEFAULT_RUNTIME_BINARY: &str = "webapp-runtime";

/// Client binaries whose presence implies a usable persistence driver.
const DRIVER_BINARIES: &[(&str, &str)] = &[
    ("pgsql", "psql"),
    ("mysql", "mysql"),
    ("sqlite", "sqlite3"),
    ("mongodb", "mongosh"),
];

/// Well-known CA root bundle locations, checked in order.
///
/// Mirrors the lookup order used by common TLS stacks on Linux and BSD.
const CA_BUNDLE_PATHS: &[&str] = &[
    "/etc/ssl/certs/ca-certificates.crt",
    "/etc/pki/tls/certs/ca-bundle.crt",
    "/etc/ssl/ca-bundle.pem",
    "/etc/pki/ca-trust/extracted/pem/tls-ca-bundle.pem",
    "/usr/local/share/certs/ca-root-nss.crt",
    "/etc/ssl/cert.pem",
];

/// Probe backed by the real host environment.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    directives: BTreeMap<String, String>,
    config_path: Option<PathBuf>,
}

impl SystemProbe {
    /// Discover the runtime configuration for an install root and build
    /// the probe. Missing or unreadable configuration is tolerated: the
    /// probe then simply reports every directive as unset.
    pub fn discover(layout: &PathLayout) -> Self {
        let env_path = std::env::var_os("READYCHECK_RUNTIME_INI").map(PathBuf::from);
        if let Some(path) = env_path.as_deref().filter(|p| !p.is_file()) {
            tracing::warn!(
                "READYCHECK_RUNTIME_INI points at nonexistent file {}",
                path.display()
            );
        }

        let config_path = env_path
            .or_else(|| layout.config.as_ref().map(|c| c.join("runtime.ini")))
            .filter(|p| p.is_file());

        let directives = match &config_path {
            Some(path) => match fs::read_to_string(path) {
                Ok(raw) => parse_ini(&raw),
                Err(e) => {
                    tracing::warn!("Unreadable runtime config {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            None => BTreeMap::new(),
        };

        tracing::debug!(
            "Runtime config: {} ({} directives)",
            config_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string()),
            directives.len()
        );

        Self {
            directives,
            config_path,
        }
    }

    /// Build a probe from an in-memory directive map (used by unit tests).
    pub fn from_directives(directives: BTreeMap<String, String>) -> Self {
        Self {
            directives,
            config_path: None,
        }
    }

    fn comma_list(&self, directive: &str) -> Vec<String> {
        self.directives
            .get(directive)
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl RuntimeProbe for SystemProbe {
    fn interpreter_version(&self) -> Option<String> {
        if let Some(pinned) = self.directives.get("runtime.version") {
            return Some(pinned.clone());
        }

        let binary = self
            .directives
            .get("runtime.binary")
            .cloned()
            .unwrap_or_else(|| DEFAULT_RUNTIME_BINARY.to_string());
        let resolved = resolve_on_path(&binary)?;

        let output = Command::new(&resolved).arg("--version").output().ok()?;
        if !output.status.success() {
            tracing::debug!("{} --version exited nonzero", resolved.display());
            return None;
        }
        extract_version(&String::from_utf8_lossy(&output.stdout))
    }

    fn capability_available(&self, name: &str) -> bool {
        self.comma_list("runtime.capabilities")
            .iter()
            .any(|c| c == name)
    }

    fn capability_version(&self, name: &str) -> Option<String> {
        // "runtime.capability_versions = regex:10.42, icu:72.1"
        self.comma_list("runtime.capability_versions")
            .iter()
            .find_map(|entry| {
                let (cap, version) = entry.split_once(':')?;
                (cap.trim() == name).then(|| version.trim().to_string())
            })
    }

    fn read_directive(&self, name: &str) -> Option<String> {
        self.directives.get(name).cloned()
    }

    fn default_timezone(&self) -> Option<String> {
        self.directives
            .get("date.timezone")
            .cloned()
            .or_else(|| std::env::var("TZ").ok())
            .filter(|tz| !tz.is_empty())
    }

    fn timezone_table(&self) -> BTreeMap<String, Vec<String>> {
        build_timezone_table()
    }

    fn persistence_drivers(&self) -> Vec<String> {
        let configured = self.comma_list("runtime.drivers");
        if !configured.is_empty() {
            return configured;
        }

        DRIVER_BINARIES
            .iter()
            .filter(|(_, binary)| resolve_on_path(binary).is_some())
            .map(|(driver, _)| driver.to_string())
            .collect()
    }

    fn ca_bundle_path(&self) -> Option<PathBuf> {
        if let Some(env_path) = std::env::var_os("SSL_CERT_FILE") {
            let path = PathBuf::from(env_path);
            if path.is_file() {
                return Some(path);
            }
        }

        CA_BUNDLE_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
    }

    fn config_file_path(&self) -> Option<PathBuf> {
        self.config_path.clone()
    }
}

/// Parse INI-style text into a flat directive map.
///
/// `[section]` headers prefix subsequent keys as `section.key`; `;` and `#`
/// start comments; surrounding quotes on values are stripped.
pub fn parse_ini(raw: &str) -> BTreeMap<String, String> {
    let mut directives = BTreeMap::new();
    let mut section = String::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = name.trim().to_string();
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        let full_key = if section.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", section, key)
        };
        directives.insert(full_key, value.to_string());
    }

    directives
}

/// Resolve a binary on PATH, honoring absolute paths as-is.
pub fn resolve_on_path(binary: &str) -> Option<PathBuf> {
    let direct = Path::new(binary);
    if direct.is_absolute() {
        return (direct.is_file() && is_executable(direct)).then(|| direct.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Flatten the platform timezone database into abbreviation → zone ids.
///
/// Each zone is sampled at a winter and a summer instant so both standard
/// and daylight abbreviations appear. Zones whose designation is purely
/// numeric (e.g. "+07") are keyed by their fixed offset instead, so no
/// canonical zone id is lost when the table is flattened into a set.
fn build_timezone_table() -> BTreeMap<String, Vec<String>> {
    let mut table: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let instants = [(2024, 1, 1), (2024, 7, 1)].into_iter().filter_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(12, 0, 0))
    });

    for instant in instants {
        for tz in TZ_VARIANTS {
            let offset = tz.offset_from_utc_datetime(&instant);
            let key = offset
                .abbreviation()
                .map(str::to_string)
                .unwrap_or_else(|| offset.fix().to_string());

            let zones = table.entry(key).or_default();
            let id = tz.name().to_string();
            if !zones.contains(&id) {
                zones.push(id);
            }
        }
    }

    table
}
