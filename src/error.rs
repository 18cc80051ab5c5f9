//! Error types for readycheck operations.
//!
//! This module defines [`ReadycheckError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A failed requirement is *data*, never an error: the evaluation run
//!   always completes and reports everything it checked.
//! - Collaborator unavailability (unresolvable path, absent capability)
//!   silently skips the dependent checks.
//! - The only fatal construction error is [`ReadycheckError::VersionDiscovery`]:
//!   no explicit application version was supplied and none could be read from
//!   the install root.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for readycheck operations.
#[derive(Debug, Error)]
pub enum ReadycheckError {
    /// No application version was supplied and the install root yields none.
    #[error(
        "Unable to determine the application version: no --app-version given and \
         no readable version manifest under {root}"
    )]
    VersionDiscovery { root: PathBuf },

    /// A version string could not be parsed even leniently.
    #[error("Invalid version string: {value}")]
    InvalidVersion { value: String },

    /// The console report could not be written.
    #[error("Failed to write report: {0}")]
    Report(#[source] std::io::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for readycheck operations.
pub type Result<T> = std::result::Result<T, ReadycheckError>;
