//! Readycheck - Environment readiness checker for a web application.
//!
//! Readycheck inspects the host the application is about to run on and
//! reports, without ever aborting mid-run, which mandatory requirements
//! and optional recommendations the environment satisfies. A failed check
//! is data with remediation text attached, not an error.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and the check driver
//! - [`error`] - Error types and result aliases
//! - [`paths`] - Install-root discovery and directory layout resolution
//! - [`probe`] - Runtime introspection behind the [`probe::RuntimeProbe`] trait
//! - [`report`] - Console rendering and the serializable outcome
//! - [`requirements`] - Requirement model and the concrete policy set
//! - [`version`] - Lenient version handling and the interpreter floor policy
//! - [`web`] - Loopback-guarded web entry point
//!
//! # Example
//!
//! ```
//! use readycheck::probe::MockProbe;
//! use readycheck::requirements::RequirementCollection;
//!
//! let probe = MockProbe::healthy();
//! let mut collection = RequirementCollection::new();
//! collection.add_requirement(
//!     probe.interpreter_version.is_some(),
//!     "Interpreter version must be known",
//!     "Put the runtime binary on PATH.",
//! );
//! assert!(collection.passed());
//! ```

pub mod cli;
pub mod error;
pub mod paths;
pub mod probe;
pub mod report;
pub mod requirements;
pub mod version;
pub mod web;

pub use error::{ReadycheckError, Result};
