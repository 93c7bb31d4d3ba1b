//! Visible-set computation: which reconciled entries a [`ViewState`] shows.
//!
//! Rules shared by every entry kind:
//! - Search matches the name or any recorded value, case-insensitively
//! - The fork filter keeps an entry when any revision it was introduced or
//!   changed at is selected
//!
//! Recomputed in full on every state change.

use serde::Serialize;
use tracing::debug;

use specview_reconcile::{
    build_comparison_rows_with, BaseEntity, ComparisonRow, ItemChange, ItemHistory,
    OverrideEntry, VariableSet,
};
use specview_types::{ForkPolicy, RevisionLabel};

use crate::state::ViewState;

/// A variable that passes the current filters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisibleVariable<'a> {
    /// Base name.
    pub name: &'a str,
    pub entity: &'a BaseEntity,
    /// Overrides in recording order; may be empty.
    pub overrides: &'a [OverrideEntry],
}

/// An item that passes the current filters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisibleItem<'a> {
    /// Item name.
    pub name: &'a str,
    /// Changes, oldest first.
    pub changes: &'a [ItemChange],
}

/// Comparison rows for one variable that passes the current filters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisibleComparison {
    /// Base name.
    pub name: String,
    /// Rows, newest revision first.
    pub rows: Vec<ComparisonRow>,
}

/// Variables of `set` visible under `state`, in name order.
pub fn compute_visible_variables<'a>(
    set: &'a VariableSet,
    state: &ViewState,
) -> Vec<VisibleVariable<'a>> {
    let needle = state.search_needle();
    let visible: Vec<VisibleVariable<'a>> = set
        .base_entities
        .iter()
        .map(|(name, entity)| VisibleVariable {
            name,
            entity,
            overrides: set.overrides_for(name),
        })
        .filter(|var| {
            variable_matches(needle.as_deref(), var.entity, var.overrides)
                && any_selected(state, variable_revisions(var.entity, var.overrides))
        })
        .collect();
    debug!(total = set.len(), visible = visible.len(), "visible variables");
    visible
}

/// Items of `history` visible under `state`, in name order.
pub fn compute_visible_items<'a>(
    history: &'a ItemHistory,
    state: &ViewState,
) -> Vec<VisibleItem<'a>> {
    let needle = state.search_needle();
    let visible: Vec<VisibleItem<'a>> = history
        .iter()
        .filter(|(name, changes)| {
            let text_match = needle.as_deref().map_or(true, |needle| {
                contains_folded(name, needle)
                    || changes.iter().any(|c| contains_folded(&c.value, needle))
            });
            text_match && any_selected(state, changes.iter().map(|c| &c.revision))
        })
        .map(|(name, changes)| VisibleItem {
            name,
            changes,
        })
        .collect();
    debug!(total = history.len(), visible = visible.len(), "visible items");
    visible
}

/// Comparison rows for every variable in either set that is visible under
/// `state` on at least one side.
pub fn compute_visible_comparisons(
    policy: &ForkPolicy,
    a: &VariableSet,
    b: &VariableSet,
    state: &ViewState,
) -> Vec<VisibleComparison> {
    let mut names: Vec<&str> = compute_visible_variables(a, state)
        .into_iter()
        .chain(compute_visible_variables(b, state))
        .map(|var| var.name)
        .collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .map(|name| VisibleComparison {
            name: name.to_string(),
            rows: build_comparison_rows_with(
                policy,
                a.get(name),
                a.overrides_for(name),
                b.get(name),
                b.overrides_for(name),
            ),
        })
        .collect()
}

fn variable_matches(needle: Option<&str>, entity: &BaseEntity, overrides: &[OverrideEntry]) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    contains_folded(&entity.name, needle)
        || contains_folded(&entity.value, needle)
        || overrides.iter().any(|o| contains_folded(&o.value, needle))
}

fn variable_revisions<'a>(
    entity: &'a BaseEntity,
    overrides: &'a [OverrideEntry],
) -> impl Iterator<Item = &'a RevisionLabel> {
    std::iter::once(&entity.introducing_revision).chain(overrides.iter().map(|o| &o.revision))
}

fn any_selected<'a>(state: &ViewState, mut revisions: impl Iterator<Item = &'a RevisionLabel>) -> bool {
    state.forks.is_empty() || revisions.any(|revision| state.fork_selected(revision))
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
