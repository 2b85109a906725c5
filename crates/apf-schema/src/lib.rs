//! Shared schema and wire types for Analogue Pocket core packages.
//!
//! - [`rule`]: a small typed rule tree for validating nested documents.
//! - [`analogue`]: the fixed `analogue.toml` schema built from those rules.
//! - [`manifest`]: serde types for the JSON manifests the loader reads.

pub mod analogue;
pub mod manifest;
pub mod rule;

// Re-exports
pub use analogue::validate;
pub use manifest::MAGIC;
pub use rule::{Breadcrumb, ValidationError};
