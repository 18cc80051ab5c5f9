//! Runtime introspection behind one narrow interface.
//!
//! The requirement builder never touches the platform directly: everything
//! it wants to know about the running environment goes through
//! [`RuntimeProbe`]. That keeps the policy layer a pure function of its
//! inputs and makes it trivially substitutable with [`mock::MockProbe`]
//! in tests.
//!
//! # Modules
//!
//! - [`system`] - The real probe: runtime config file, interpreter binary,
//!   timezone data, driver and CA-bundle discovery
//! - [`mock`] - In-memory probe for tests

pub mod mock;
pub mod system;

use std::collections::BTreeMap;
use std::path::PathBuf;

pub use mock::MockProbe;
pub use system::SystemProbe;

/// Read-only view of the runtime environment being checked.
///
/// Every method is a cheap, synchronous, local read. `None`/empty answers
/// mean "unavailable" and make the caller skip dependent checks; they are
/// never errors.
pub trait RuntimeProbe {
    /// Version of the interpreter the application would run under.
    fn interpreter_version(&self) -> Option<String>;

    /// Whether a named optional runtime feature is present.
    fn capability_available(&self, name: &str) -> bool;

    /// Version of a named capability, when the runtime reports one.
    fn capability_version(&self, name: &str) -> Option<String>;

    /// Current value of a configuration directive. `None` means unset.
    fn read_directive(&self, name: &str) -> Option<String>;

    /// The configured default timezone, if any.
    fn default_timezone(&self) -> Option<String>;

    /// Timezone abbreviation table: abbreviation → canonical zone ids.
    fn timezone_table(&self) -> BTreeMap<String, Vec<String>>;

    /// Names of the persistence drivers registered with the runtime.
    fn persistence_drivers(&self) -> Vec<String>;

    /// Path to a trusted CA root bundle, when one is discoverable.
    fn ca_bundle_path(&self) -> Option<PathBuf>;

    /// The runtime configuration file in effect, when known.
    fn config_file_path(&self) -> Option<PathBuf>;

    /// Whether the checked platform is a Windows family system.
    ///
    /// Overridable so platform-gated checks stay testable everywhere.
    fn on_windows(&self) -> bool {
        cfg!(windows)
    }
}
