//! Report rendering.
//!
//! # Modules
//!
//! - [`theme`] - Styles and explicit reporter configuration
//! - [`console`] - Terminal glyph stream, banners, and fix sections
//! - [`outcome`] - Serializable summary for JSON output and the web surface

pub mod console;
pub mod outcome;
pub mod theme;

pub use console::ConsoleReporter;
pub use outcome::{CheckOutcome, FailedItem};
pub use theme::{should_use_colors, CheckTheme, ReporterConfig};
