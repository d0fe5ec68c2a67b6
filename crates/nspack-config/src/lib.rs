//! Webpack configuration assembly for NativeScript application bundles.
//!
//! [`assemble`] turns a [`BuildEnvironment`] and a [`ProjectLayout`] into a
//! [`BuildConfiguration`]: entry points, transform rules and the ordered
//! plugin stages, serialized with the bundler's own field names.

pub mod config;
pub mod descriptors;
pub mod entries;
pub mod environment;
pub mod error;
pub mod platform;
pub mod project;
pub mod rules;
pub mod stages;
pub mod validation;

// Re-export main types
pub use config::*;
pub use descriptors::*;
pub use entries::{build_entries, EntryMap};
pub use environment::*;
pub use error::*;
pub use platform::*;
pub use project::ProjectLayout;
pub use rules::{
    build_rules, LoaderStep, MatchPattern, RuleCategory, RuleSet, TransformChain, TransformRule,
};
pub use stages::{build_stages, BuildStage, StageComposer, StageGate};

// Re-export validation
pub use validation::{
    ensure_present, validate_fs, validate_structure, ConfigValidator, FsValidator,
    StructureValidator,
};
