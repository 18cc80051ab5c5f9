//! Requirement model and the policy that instantiates it.
//!
//! # Modules
//!
//! - [`requirement`] - One immutable checkable condition
//! - [`directive`] - Configuration-directive checks and value normalization
//! - [`collection`] - Ordered two-tier container (mandatory / recommended)
//! - [`builder`] - The concrete requirement set for the application

pub mod builder;
pub mod collection;
pub mod directive;
pub mod requirement;

pub use builder::RequirementSetBuilder;
pub use collection::RequirementCollection;
pub use directive::{DirectiveCheck, DirectiveValue, ExpectedValue};
pub use requirement::Requirement;
