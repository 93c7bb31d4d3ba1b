//! Item reconciliation: opaque text records grouped by the revisions in which
//! they changed.
//!
//! Items have no suffix parsing. Included revisions are walked oldest first
//! and a change is recorded whenever an item's text differs from the last one
//! recorded for it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use specview_types::{FieldKind, ForkPolicy, RevisionLabel, RevisionMap};

use crate::value::text_of;
use crate::variables::{field_records, included_revisions};

/// An item's text as of the revision that changed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChange {
    /// Revision in which the text changed.
    pub revision: RevisionLabel,
    /// Item text from that revision on.
    pub value: String,
}

/// Item name to its changes, oldest first. Every list is non-empty.
pub type ItemHistory = BTreeMap<String, Vec<ItemChange>>;

/// Reconcile an item field under the default [`ForkPolicy`].
pub fn reconcile_items(dataset: Option<&RevisionMap>, field: FieldKind) -> ItemHistory {
    reconcile_items_with(&ForkPolicy::default(), dataset, field)
}

/// Reconcile an item field under `policy`.
pub fn reconcile_items_with(
    policy: &ForkPolicy,
    dataset: Option<&RevisionMap>,
    field: FieldKind,
) -> ItemHistory {
    let mut history = ItemHistory::new();
    let Some(dataset) = dataset else {
        return history;
    };

    let mut revisions = included_revisions(policy, dataset);
    policy.sort_ascending(&mut revisions);

    for revision in revisions {
        let Some(records) = field_records(dataset, revision, field) else {
            continue;
        };
        for (name, record) in records {
            let Some(text) = text_of(record) else {
                continue;
            };
            let changes = history.entry(name.clone()).or_default();
            if changes.last().is_some_and(|last| last.value == text) {
                continue;
            }
            changes.push(ItemChange {
                revision: RevisionLabel::new(revision),
                value: text,
            });
        }
    }

    debug!(
        field = %field,
        items = history.len(),
        changes = history.values().map(Vec::len).sum::<usize>(),
        "items reconciled"
    );
    history
}

/// Consecutive `(older, newer)` pairs of a change list, for diffing each
/// revision against its predecessor.
pub fn item_change_pairs(
    changes: &[ItemChange],
) -> impl Iterator<Item = (&ItemChange, &ItemChange)> {
    changes.windows(2).map(|pair| (&pair[0], &pair[1]))
}

/// The change in effect at `revision`: the newest one recorded at or before
/// it. `None` when the item did not exist yet.
pub fn item_value_at<'a>(
    policy: &ForkPolicy,
    changes: &'a [ItemChange],
    revision: &RevisionLabel,
) -> Option<&'a ItemChange> {
    changes
        .iter()
        .filter(|change| {
            policy.compare_ascending(change.revision.as_str(), revision.as_str())
                != std::cmp::Ordering::Greater
        })
        .max_by(|a, b| policy.compare_ascending(a.revision.as_str(), b.revision.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn reconcile(value: Value) -> ItemHistory {
        let data = value.as_object().cloned().unwrap();
        reconcile_items(Some(&data), FieldKind::Functions)
    }

    #[test]
    fn unchanged_item_recorded_once() {
        let history = reconcile(json!({
            "PHASE0": { "functions": { "f": "def f(): pass" } },
            "ALTAIR": { "functions": { "f": "def f(): pass" } }
        }));
        assert_eq!(history["f"].len(), 1);
        assert_eq!(history["f"][0].revision.as_str(), "PHASE0");
    }

    #[test]
    fn changes_grouped_by_revision() {
        let history = reconcile(json!({
            "PHASE0": { "functions": { "f": "v1", "g": "g1" } },
            "ALTAIR": { "functions": { "f": "v2", "g": "g1" } },
            "BELLATRIX": { "functions": { "f": "v2", "h": "h1" } },
            "CAPELLA": { "functions": { "f": "v3" } }
        }));
        let f: Vec<(&str, &str)> = history["f"]
            .iter()
            .map(|c| (c.revision.as_str(), c.value.as_str()))
            .collect();
        assert_eq!(f, vec![("PHASE0", "v1"), ("ALTAIR", "v2"), ("CAPELLA", "v3")]);
        assert_eq!(history["g"].len(), 1);
        assert_eq!(history["h"][0].revision.as_str(), "BELLATRIX");
    }

    #[test]
    fn revisions_walked_chronologically() {
        let history = reconcile(json!({
            "ALTAIR": { "functions": { "f": "new" } },
            "PHASE0": { "functions": { "f": "old" } }
        }));
        let revisions: Vec<&str> = history["f"].iter().map(|c| c.revision.as_str()).collect();
        assert_eq!(revisions, vec!["PHASE0", "ALTAIR"]);
    }

    #[test]
    fn suffixes_are_not_parsed() {
        let history = reconcile(json!({
            "PHASE0": { "functions": { "f_altair": "x" } },
            "ALTAIR": {}
        }));
        assert!(history.contains_key("f_altair"));
        assert!(!history.contains_key("f"));
    }

    #[test]
    fn excluded_revisions_and_null_records_skipped() {
        let history = reconcile(json!({
            "PHASE0": { "functions": { "f": "a", "n": null } },
            "WHISK": { "functions": { "f": "whisk" } },
            "EIP7732": { "functions": { "f": "eip" } }
        }));
        assert_eq!(history["f"].len(), 1);
        assert!(!history.contains_key("n"));
    }

    #[test]
    fn missing_dataset_is_empty() {
        assert!(reconcile_items(None, FieldKind::SszObjects).is_empty());
    }

    #[test]
    fn change_pairs() {
        let history = reconcile(json!({
            "PHASE0": { "functions": { "f": "1" } },
            "ALTAIR": { "functions": { "f": "2" } },
            "BELLATRIX": { "functions": { "f": "3" } }
        }));
        let pairs: Vec<(&str, &str)> = item_change_pairs(&history["f"])
            .map(|(old, new)| (old.value.as_str(), new.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("1", "2"), ("2", "3")]);
        assert_eq!(item_change_pairs(&history["f"][..1]).count(), 0);
    }

    #[test]
    fn value_at_revision() {
        let history = reconcile(json!({
            "PHASE0": { "functions": { "f": "1" } },
            "BELLATRIX": { "functions": { "f": "2" } },
            "ALTAIR": {}
        }));
        let policy = ForkPolicy::default();
        let at = |fork: &str| {
            item_value_at(&policy, &history["f"], &RevisionLabel::new(fork))
                .map(|change| change.value.as_str())
        };
        assert_eq!(at("PHASE0"), Some("1"));
        assert_eq!(at("ALTAIR"), Some("1"));
        assert_eq!(at("CAPELLA"), Some("2"));

        let late = reconcile(json!({ "DENEB": { "functions": { "g": "x" } } }));
        assert!(item_value_at(&policy, &late["g"], &RevisionLabel::new("ALTAIR")).is_none());
    }
}
