//! Comparison rows: two reconciled datasets merged revision by revision.
//!
//! For one base name, the rows cover every revision at which either dataset
//! introduced or overrode it, newest first. A dataset with nothing recorded at
//! a row's revision shows [`Lookup::Absent`] (serialized as `null`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use specview_types::{ForkPolicy, RevisionLabel};

use crate::variables::{BaseEntity, OverrideEntry, VariableSet};

/// One revision's values across two datasets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Revision this row describes.
    pub revision: RevisionLabel,
    /// Type from dataset A, falling back to dataset B.
    #[serde(rename = "type")]
    pub ty: Option<String>,
    /// Dataset A's value at `revision`; `None` when it has no entry there.
    pub value_a: Option<String>,
    /// Dataset B's value at `revision`; `None` when it has no entry there.
    pub value_b: Option<String>,
}

/// A dataset's value at one revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    Present { ty: &'a str, value: &'a str },
    Absent,
}

impl<'a> Lookup<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn value(&self) -> Option<&'a str> {
        match *self {
            Lookup::Present { value, .. } => Some(value),
            Lookup::Absent => None,
        }
    }

    pub fn ty(&self) -> Option<&'a str> {
        match *self {
            Lookup::Present { ty, .. } => Some(ty),
            Lookup::Absent => None,
        }
    }
}

/// Resolve a dataset's value at exactly `revision`.
///
/// The introducing revision yields the base value; any other revision yields
/// the override recorded for it, or [`Lookup::Absent`].
pub fn effective_value_at<'a>(
    base: Option<&'a BaseEntity>,
    overrides: &'a [OverrideEntry],
    revision: &RevisionLabel,
) -> Lookup<'a> {
    let Some(base) = base else {
        return Lookup::Absent;
    };
    if base.introducing_revision == *revision {
        return Lookup::Present {
            ty: &base.ty,
            value: &base.value,
        };
    }
    overrides
        .iter()
        .find(|entry| entry.revision == *revision)
        .map_or(Lookup::Absent, |entry| Lookup::Present {
            ty: &entry.ty,
            value: &entry.value,
        })
}

/// Build comparison rows under the default [`ForkPolicy`].
pub fn build_comparison_rows(
    base_a: Option<&BaseEntity>,
    overrides_a: &[OverrideEntry],
    base_b: Option<&BaseEntity>,
    overrides_b: &[OverrideEntry],
) -> Vec<ComparisonRow> {
    build_comparison_rows_with(&ForkPolicy::default(), base_a, overrides_a, base_b, overrides_b)
}

/// Build comparison rows for one base name, newest revision first.
pub fn build_comparison_rows_with(
    policy: &ForkPolicy,
    base_a: Option<&BaseEntity>,
    overrides_a: &[OverrideEntry],
    base_b: Option<&BaseEntity>,
    overrides_b: &[OverrideEntry],
) -> Vec<ComparisonRow> {
    let mut revisions: Vec<&RevisionLabel> = Vec::new();
    let candidates = base_a
        .map(|base| &base.introducing_revision)
        .into_iter()
        .chain(overrides_a.iter().map(|entry| &entry.revision))
        .chain(base_b.map(|base| &base.introducing_revision))
        .chain(overrides_b.iter().map(|entry| &entry.revision));
    for revision in candidates {
        if !revisions.contains(&revision) {
            revisions.push(revision);
        }
    }
    policy.sort_descending(&mut revisions);

    revisions
        .into_iter()
        .map(|revision| {
            let a = effective_value_at(base_a, overrides_a, revision);
            let b = effective_value_at(base_b, overrides_b, revision);
            ComparisonRow {
                revision: revision.clone(),
                ty: a.ty().or(b.ty()).map(str::to_string),
                value_a: a.value().map(str::to_string),
                value_b: b.value().map(str::to_string),
            }
        })
        .collect()
}

/// Build comparison rows under the default [`ForkPolicy`] for every name in
/// either set.
pub fn build_comparison_table(
    a: &VariableSet,
    b: &VariableSet,
) -> BTreeMap<String, Vec<ComparisonRow>> {
    build_comparison_table_with(&ForkPolicy::default(), a, b)
}

/// Build comparison rows for every name in either set, keyed by base name.
pub fn build_comparison_table_with(
    policy: &ForkPolicy,
    a: &VariableSet,
    b: &VariableSet,
) -> BTreeMap<String, Vec<ComparisonRow>> {
    a.names()
        .chain(b.names())
        .map(|name| {
            let rows = build_comparison_rows_with(
                policy,
                a.get(name),
                a.overrides_for(name),
                b.get(name),
                b.overrides_for(name),
            );
            (name.to_string(), rows)
        })
        .collect()
}
