//! Foundation types for specview.
//!
//! This crate provides the revision vocabulary shared by every other specview
//! crate: fork labels and their chronological ordering, the fixed set of
//! artifact fields, and strict loading of the JSON artifact.
//!
//! # Key Types
//!
//! - [`RevisionLabel`] — Canonical (uppercase) fork identifier
//! - [`ForkPolicy`] — Known fork order plus exclusion rules, loadable from TOML
//! - [`FieldKind`] — The fixed field vocabulary and its flavor
//! - [`Artifact`] — The parsed `{ dataset: { revision: { field: { name: record } } } }` document

pub mod artifact;
pub mod error;
pub mod field;
pub mod revision;

pub use artifact::{Artifact, RevisionMap};
pub use error::{Result, TypeError};
pub use field::{FieldFlavor, FieldKind};
pub use revision::{
    compare_revisions_ascending, compare_revisions_descending, is_revision_included,
    ForkPolicy, RevisionLabel, EXCLUDED_FORKS, EXPERIMENTAL_PREFIX, KNOWN_FORK_ORDER,
};
