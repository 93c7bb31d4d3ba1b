//! Revision ("fork") labels and their chronological ordering.
//!
//! Ordering rules:
//! - Labels in the known order list compare by their index in that list
//! - A known label always sorts before an unknown one
//! - Two unknown labels compare lexicographically after uppercasing
//!
//! Descending order is defined as ascending with the arguments swapped, never
//! computed on its own.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypeError};

/// Chronological order of the known forks.
pub const KNOWN_FORK_ORDER: &[&str] = &[
    "PHASE0",
    "ALTAIR",
    "BELLATRIX",
    "CAPELLA",
    "DENEB",
    "ELECTRA",
    "FULU",
    "GLOAS",
];

/// Labels starting with this prefix are experimental feature forks.
pub const EXPERIMENTAL_PREFIX: &str = "EIP";

/// Pseudo-forks that never take part in processing.
pub const EXCLUDED_FORKS: &[&str] = &["WHISK"];

/// Canonical revision identifier. Always stored uppercase.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RevisionLabel(String);

impl RevisionLabel {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RevisionLabel {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for RevisionLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<RevisionLabel> for String {
    fn from(label: RevisionLabel) -> Self {
        label.0
    }
}

impl AsRef<str> for RevisionLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RevisionLabel {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for RevisionLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Debug for RevisionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RevisionLabel({})", self.0)
    }
}

impl fmt::Display for RevisionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fork ordering and exclusion rules.
///
/// The default policy carries [`KNOWN_FORK_ORDER`], [`EXPERIMENTAL_PREFIX`]
/// and [`EXCLUDED_FORKS`]. A policy can be loaded from TOML; absent keys fall
/// back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForkPolicy {
    /// Known forks, oldest first.
    pub known_order: Vec<String>,
    /// Case-insensitive prefix marking experimental forks. Empty disables it.
    pub experimental_prefix: String,
    /// Labels excluded outright (case-insensitive).
    pub excluded: Vec<String>,
}

impl Default for ForkPolicy {
    fn default() -> Self {
        Self {
            known_order: KNOWN_FORK_ORDER.iter().map(|s| s.to_string()).collect(),
            experimental_prefix: EXPERIMENTAL_PREFIX.to_string(),
            excluded: EXCLUDED_FORKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ForkPolicy {
    /// Parse a policy from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a policy file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TypeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Returns `false` for experimental and explicitly excluded labels.
    pub fn is_included(&self, label: &str) -> bool {
        included_with(&self.experimental_prefix, &self.excluded, label)
    }

    /// Chronological comparison.
    pub fn compare_ascending(&self, a: &str, b: &str) -> Ordering {
        compare_with(&self.known_order, a, b)
    }

    /// Reverse chronological comparison.
    pub fn compare_descending(&self, a: &str, b: &str) -> Ordering {
        self.compare_ascending(b, a)
    }

    /// Index of `label` in the known order, if it is a known fork.
    pub fn position(&self, label: &str) -> Option<usize> {
        position_in(&self.known_order, label)
    }

    /// Sort labels oldest first.
    pub fn sort_ascending<L: AsRef<str>>(&self, labels: &mut [L]) {
        labels.sort_by(|a, b| self.compare_ascending(a.as_ref(), b.as_ref()));
    }

    /// Sort labels newest first.
    pub fn sort_descending<L: AsRef<str>>(&self, labels: &mut [L]) {
        labels.sort_by(|a, b| self.compare_descending(a.as_ref(), b.as_ref()));
    }
}

/// [`ForkPolicy::is_included`] under the default policy.
pub fn is_revision_included(label: &str) -> bool {
    included_with(EXPERIMENTAL_PREFIX, EXCLUDED_FORKS, label)
}

/// [`ForkPolicy::compare_ascending`] under the default policy.
pub fn compare_revisions_ascending(a: &str, b: &str) -> Ordering {
    compare_with(KNOWN_FORK_ORDER, a, b)
}

/// [`ForkPolicy::compare_descending`] under the default policy.
pub fn compare_revisions_descending(a: &str, b: &str) -> Ordering {
    compare_revisions_ascending(b, a)
}

fn position_in<S: AsRef<str>>(order: &[S], label: &str) -> Option<usize> {
    order.iter().position(|known| known.as_ref().eq_ignore_ascii_case(label))
}

fn compare_with<S: AsRef<str>>(order: &[S], a: &str, b: &str) -> Ordering {
    match (position_in(order, a), position_in(order, b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_ascii_uppercase().cmp(&b.to_ascii_uppercase()),
    }
}

fn included_with<S: AsRef<str>>(prefix: &str, excluded: &[S], label: &str) -> bool {
    let upper = label.to_ascii_uppercase();
    if !prefix.is_empty() && upper.starts_with(&prefix.to_ascii_uppercase()) {
        return false;
    }
    !excluded.iter().any(|name| name.as_ref().eq_ignore_ascii_case(&upper))
}
