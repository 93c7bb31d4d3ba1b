//! Splitting raw entity names into a base name and a revision suffix.

use specview_types::RevisionLabel;

/// A raw entity name split into its base and optional revision suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedName {
    /// The name without its suffix; the whole name when none matched.
    pub base: String,
    /// The matched suffix label, if any.
    pub revision: Option<RevisionLabel>,
}

/// Split `raw` on a trailing `_<LABEL>` suffix.
///
/// Labels are tried in the order given and the first match wins. Matching is
/// case-insensitive; the base keeps its original casing and the revision is
/// uppercased. Names without a matching suffix come back unchanged.
///
/// # Examples
///
/// ```
/// use specview_reconcile::parse_entity_name;
///
/// let parsed = parse_entity_name("MAX_BLOBS_electra", &["DENEB", "ELECTRA"]);
/// assert_eq!(parsed.base, "MAX_BLOBS");
/// assert_eq!(parsed.revision.unwrap().as_str(), "ELECTRA");
///
/// let plain = parse_entity_name("SLOTS_PER_EPOCH", &["DENEB"]);
/// assert_eq!(plain.base, "SLOTS_PER_EPOCH");
/// assert!(plain.revision.is_none());
/// ```
pub fn parse_entity_name<L: AsRef<str>>(raw: &str, known_labels: &[L]) -> ParsedName {
    for label in known_labels {
        let label = label.as_ref();
        if let Some(base) = strip_revision_suffix(raw, label) {
            return ParsedName {
                base: base.to_string(),
                revision: Some(RevisionLabel::new(label)),
            };
        }
    }
    ParsedName {
        base: raw.to_string(),
        revision: None,
    }
}

fn strip_revision_suffix<'a>(raw: &'a str, label: &str) -> Option<&'a str> {
    if label.is_empty() || raw.len() <= label.len() {
        return None;
    }
    let split = raw.len() - label.len() - 1;
    if !raw.is_char_boundary(split) {
        return None;
    }
    let (base, suffix) = raw.split_at(split);
    let tail = suffix.strip_prefix('_')?;
    tail.eq_ignore_ascii_case(label).then_some(base)
}
