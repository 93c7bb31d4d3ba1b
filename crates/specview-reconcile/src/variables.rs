//! Variable reconciliation: per-revision `[type, value]` records into base
//! entities and their overrides.
//!
//! Revisions are processed in the dataset's document order (experimental and
//! excluded forks skipped). For each record the raw name is split on a
//! revision suffix:
//!
//! - An unsuffixed name carries the mainline value and always overwrites the
//!   base entity's type and value.
//! - A suffixed name (`FOO_ALTAIR`) records an override for that revision,
//!   but only when its value differs from the most recently recorded value for
//!   the entity. The first encounter of a (name, revision) pair decides;
//!   re-encountering the same suffixed record in later revisions is a no-op,
//!   whatever its value.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use specview_types::{FieldKind, ForkPolicy, RevisionLabel, RevisionMap};

use crate::name::{parse_entity_name, ParsedName};
use crate::value::parse_value;

/// The revision-independent identity of a variable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEntity {
    /// Name with any revision suffix stripped.
    pub name: String,
    /// Earliest revision at which any record for this name appears.
    pub introducing_revision: RevisionLabel,
    /// Type from the last unsuffixed record, or the first record seen.
    #[serde(rename = "type")]
    pub ty: String,
    /// Value from the last unsuffixed record, or the first record seen.
    pub value: String,
}

/// A change to a variable's value at a later revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    /// Revision named by the record's suffix.
    pub revision: RevisionLabel,
    /// The value in effect from this revision on.
    pub value: String,
    /// Declared type of the overriding record.
    #[serde(rename = "type")]
    pub ty: String,
}

/// Reconciled variables for one (dataset, field) pair.
///
/// Names without overrides have no entry in `overrides`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSet {
    /// Base name to its entity.
    pub base_entities: BTreeMap<String, BaseEntity>,
    /// Base name to its overrides, in the order they were recorded.
    pub overrides: BTreeMap<String, Vec<OverrideEntry>>,
}

impl VariableSet {
    pub fn is_empty(&self) -> bool {
        self.base_entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.base_entities.len()
    }

    pub fn get(&self, name: &str) -> Option<&BaseEntity> {
        self.base_entities.get(name)
    }

    /// Overrides for `name`, oldest first. Empty when there are none.
    pub fn overrides_for(&self, name: &str) -> &[OverrideEntry] {
        self.overrides.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Base names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.base_entities.keys().map(String::as_str)
    }

    /// Total number of overrides across all names.
    pub fn override_count(&self) -> usize {
        self.overrides.values().map(Vec::len).sum()
    }
}

/// Reconcile a variable field under the default [`ForkPolicy`].
///
/// An absent dataset, or a field missing from every revision, yields an empty
/// set.
pub fn reconcile_variables(dataset: Option<&RevisionMap>, field: FieldKind) -> VariableSet {
    reconcile_variables_with(&ForkPolicy::default(), dataset, field)
}

/// Reconcile a variable field under `policy`.
pub fn reconcile_variables_with(
    policy: &ForkPolicy,
    dataset: Option<&RevisionMap>,
    field: FieldKind,
) -> VariableSet {
    let mut set = VariableSet::default();
    let Some(dataset) = dataset else {
        return set;
    };

    let included = included_revisions(policy, dataset);
    let mut seen: HashSet<(String, RevisionLabel)> = HashSet::new();

    for &revision in &included {
        let Some(records) = field_records(dataset, revision, field) else {
            continue;
        };

        for (raw_name, record) in records {
            let ParsedName { base, revision: suffix } = parse_entity_name(raw_name, &included);
            let parsed = parse_value(record);
            let seen_at = suffix
                .clone()
                .unwrap_or_else(|| RevisionLabel::new(revision));

            let entity = set
                .base_entities
                .entry(base.clone())
                .or_insert_with(|| BaseEntity {
                    name: base.clone(),
                    introducing_revision: seen_at.clone(),
                    ty: parsed.ty.clone(),
                    value: parsed.value.clone(),
                });
            if policy.compare_ascending(seen_at.as_str(), entity.introducing_revision.as_str())
                == std::cmp::Ordering::Less
            {
                entity.introducing_revision = seen_at;
            }

            let Some(suffix) = suffix else {
                entity.ty = parsed.ty;
                entity.value = parsed.value;
                continue;
            };

            if !seen.insert((base.clone(), suffix.clone())) {
                continue;
            }
            let list = set.overrides.entry(base).or_default();
            if most_recent_value(entity, list) == parsed.value {
                continue;
            }
            list.push(OverrideEntry {
                revision: suffix,
                value: parsed.value,
                ty: parsed.ty,
            });
        }
    }
    set.overrides.retain(|_, list| !list.is_empty());

    debug!(
        field = %field,
        entities = set.len(),
        overrides = set.override_count(),
        "variables reconciled"
    );
    set
}

/// Included revision labels in document order.
pub(crate) fn included_revisions<'a>(policy: &ForkPolicy, dataset: &'a RevisionMap) -> Vec<&'a str> {
    dataset
        .keys()
        .filter(|label| {
            let keep = policy.is_included(label);
            if !keep {
                debug!(revision = %label, "skipping excluded revision");
            }
            keep
        })
        .map(String::as_str)
        .collect()
}

/// Records under `field` at `revision`, if that slot is an object.
pub(crate) fn field_records<'a>(
    dataset: &'a RevisionMap,
    revision: &str,
    field: FieldKind,
) -> Option<&'a serde_json::Map<String, Value>> {
    dataset
        .get(revision)
        .and_then(|fields| fields.get(field.as_str()))
        .and_then(Value::as_object)
}

fn most_recent_value<'a>(entity: &'a BaseEntity, overrides: &'a [OverrideEntry]) -> &'a str {
    overrides
        .last()
        .map_or(entity.value.as_str(), |entry| entry.value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn dataset(value: Value) -> RevisionMap {
        value.as_object().cloned().unwrap()
    }

    fn reconcile(value: Value) -> VariableSet {
        let data = dataset(value);
        reconcile_variables(Some(&data), FieldKind::ConstantVars)
    }

    #[test]
    fn suffixed_override_recorded() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "ALTAIR": { "constant_vars": { "FOO_ALTAIR": ["uint64", "2"] } }
        }));

        let foo = set.get("FOO").unwrap();
        assert_eq!(foo.introducing_revision.as_str(), "PHASE0");
        assert_eq!(foo.ty, "uint64");
        assert_eq!(foo.value, "1");
        assert_eq!(
            set.overrides_for("FOO"),
            &[OverrideEntry {
                revision: RevisionLabel::new("ALTAIR"),
                value: "2".into(),
                ty: "uint64".into(),
            }]
        );
    }

    #[test]
    fn unchanged_override_suppressed() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "ALTAIR": { "constant_vars": { "FOO_ALTAIR": ["uint64", "1"] } }
        }));
        assert!(set.overrides_for("FOO").is_empty());
        assert!(!set.overrides.contains_key("FOO"));
    }

    #[test]
    fn excluded_revision_ignored() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "EIP9999": { "constant_vars": {
                "FOO_EIP9999": ["uint64", "9"],
                "BAR": ["uint64", "3"]
            } }
        }));
        assert!(set.overrides_for("FOO").is_empty());
        assert!(set.get("BAR").is_none());
        assert!(set.get("FOO_EIP9999").is_none());
    }

    #[test]
    fn repeated_suffix_across_revisions_recorded_once() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "ALTAIR": { "constant_vars": { "FOO": ["uint64", "1"], "FOO_ALTAIR": ["uint64", "2"] } },
            "BELLATRIX": { "constant_vars": {
                "FOO": ["uint64", "1"],
                "FOO_ALTAIR": ["uint64", "2"],
                "FOO_BELLATRIX": ["uint64", "3"]
            } }
        }));
        let overrides = set.overrides_for("FOO");
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides[0].revision.as_str(), "ALTAIR");
        assert_eq!(overrides[1].revision.as_str(), "BELLATRIX");
        assert_eq!(overrides[1].value, "3");
    }

    #[test]
    fn override_equal_to_previous_override_suppressed() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "ALTAIR": { "constant_vars": { "FOO_ALTAIR": ["uint64", "2"] } },
            "BELLATRIX": { "constant_vars": { "FOO_BELLATRIX": ["uint64", "2"] } }
        }));
        assert_eq!(set.overrides_for("FOO").len(), 1);
    }

    #[test]
    fn revisited_revision_keeps_first_value() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "ALTAIR": { "constant_vars": { "FOO_ALTAIR": ["uint64", "2"] } },
            "BELLATRIX": { "constant_vars": { "FOO_ALTAIR": ["uint64", "4"] } }
        }));
        let overrides = set.overrides_for("FOO");
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].value, "2");
    }

    #[test]
    fn revisited_revision_does_not_drop_later_override() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "ALTAIR": { "constant_vars": { "FOO_ALTAIR": ["uint64", "2"] } },
            "BELLATRIX": { "constant_vars": {
                "FOO_ALTAIR": ["uint64", "2"],
                "FOO_BELLATRIX": ["uint64", "3"]
            } },
            "CAPELLA": { "constant_vars": {
                "FOO_ALTAIR": ["uint64", "3"],
                "FOO_BELLATRIX": ["uint64", "3"]
            } }
        }));
        let overrides: Vec<(&str, &str)> = set
            .overrides_for("FOO")
            .iter()
            .map(|entry| (entry.revision.as_str(), entry.value.as_str()))
            .collect();
        assert_eq!(overrides, vec![("ALTAIR", "2"), ("BELLATRIX", "3")]);
    }

    #[test]
    fn suppressed_first_encounter_is_final() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } },
            "ALTAIR": { "constant_vars": { "FOO_ALTAIR": ["uint64", "1"] } },
            "BELLATRIX": { "constant_vars": { "FOO_ALTAIR": ["uint64", "5"] } }
        }));
        assert!(set.overrides_for("FOO").is_empty());
    }

    #[test]
    fn first_seen_suffixed_introduces_entity() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": {} },
            "ALTAIR": { "constant_vars": { "NEW_ALTAIR": ["Gwei", "5"] } }
        }));
        let entity = set.get("NEW").unwrap();
        assert_eq!(entity.introducing_revision.as_str(), "ALTAIR");
        assert_eq!(entity.value, "5");
        assert!(set.overrides_for("NEW").is_empty());
    }

    #[test]
    fn unsuffixed_takes_precedence_regardless_of_order() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO_PHASE0": ["uint64", "0"] } },
            "ALTAIR": { "constant_vars": { "FOO": ["uint64", "7"] } }
        }));
        let foo = set.get("FOO").unwrap();
        assert_eq!(foo.introducing_revision.as_str(), "PHASE0");
        assert_eq!(foo.value, "7");
    }

    #[test]
    fn introducing_revision_is_earliest_even_out_of_document_order() {
        let set = reconcile(json!({
            "ALTAIR": { "constant_vars": { "FOO": ["uint64", "2"] } },
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } }
        }));
        let foo = set.get("FOO").unwrap();
        assert_eq!(foo.introducing_revision.as_str(), "PHASE0");
        assert_eq!(foo.value, "1");
    }

    #[test]
    fn missing_dataset_or_field_is_empty() {
        assert!(reconcile_variables(None, FieldKind::PresetVars).is_empty());
        let set = reconcile(json!({
            "PHASE0": { "preset_vars": { "X": ["uint64", "1"] } },
            "ALTAIR": "not an object"
        }));
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_records_use_sentinels() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "ODD": "just a string", "HALF": ["Slot"] } }
        }));
        assert_eq!(set.get("ODD").unwrap().ty, "Unknown");
        assert_eq!(set.get("ODD").unwrap().value, "N/A");
        assert_eq!(set.get("HALF").unwrap().ty, "Slot");
        assert_eq!(set.get("HALF").unwrap().value, "N/A");
    }

    #[test]
    fn serializes_with_type_key() {
        let set = reconcile(json!({
            "PHASE0": { "constant_vars": { "FOO": ["uint64", "1"] } }
        }));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json["base_entities"]["FOO"],
            json!({"name": "FOO", "introducing_revision": "PHASE0", "type": "uint64", "value": "1"})
        );
    }

    fn arb_dataset() -> impl Strategy<Value = Value> {
        let revisions = ["PHASE0", "ALTAIR", "BELLATRIX", "CAPELLA"];
        let names = proptest::sample::select(vec!["FOO", "BAR", "BAZ"]);
        let suffix = proptest::sample::select(vec!["", "_ALTAIR", "_BELLATRIX", "_CAPELLA"]);
        let record = (names, suffix, 0u8..3);
        proptest::collection::vec(proptest::collection::vec(record, 0..6), 4).prop_map(
            move |per_revision| {
                let mut root = serde_json::Map::new();
                for (revision, records) in revisions.iter().zip(per_revision) {
                    let mut vars = serde_json::Map::new();
                    for (name, suffix, value) in records {
                        vars.insert(format!("{name}{suffix}"), json!(["uint64", value.to_string()]));
                    }
                    root.insert(revision.to_string(), json!({ "constant_vars": vars }));
                }
                Value::Object(root)
            },
        )
    }

    proptest! {
        #[test]
        fn reconciliation_is_idempotent(data in arb_dataset()) {
            let map = dataset(data);
            let first = reconcile_variables(Some(&map), FieldKind::ConstantVars);
            let second = reconcile_variables(Some(&map), FieldKind::ConstantVars);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn adjacent_overrides_differ(data in arb_dataset()) {
            let map = dataset(data);
            let set = reconcile_variables(Some(&map), FieldKind::ConstantVars);
            for list in set.overrides.values() {
                for pair in list.windows(2) {
                    prop_assert_ne!(&pair[0].value, &pair[1].value);
                }
            }
        }

        #[test]
        fn at_most_one_override_per_revision(data in arb_dataset()) {
            let map = dataset(data);
            let set = reconcile_variables(Some(&map), FieldKind::ConstantVars);
            for list in set.overrides.values() {
                for (i, entry) in list.iter().enumerate() {
                    prop_assert!(list[i + 1..].iter().all(|other| other.revision != entry.revision));
                }
            }
        }
    }
}
