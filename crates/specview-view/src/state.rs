use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use specview_types::{FieldKind, RevisionLabel};

/// Everything the user has chosen about what to show.
///
/// Owned by the presentation layer and passed by reference to the
/// visible-set functions. The reconciliation core never sees it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Free-text search over names and values.
    pub search: String,
    /// Forks to show. Empty means every fork.
    pub forks: Vec<RevisionLabel>,
    /// Fields to show. Empty means every field.
    pub fields: Vec<FieldKind>,
    /// Primary dataset; `None` means the artifact's first dataset.
    pub dataset: Option<String>,
    /// Dataset to compare against, if any.
    pub compare_dataset: Option<String>,
    /// Whether to diff each item revision against its predecessor.
    pub show_diffs: bool,
    /// Entry ids (`field/name`) the user has collapsed.
    pub collapsed: BTreeSet<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    pub fn with_forks<I, L>(mut self, forks: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<RevisionLabel>,
    {
        self.forks = forks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldKind>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    pub fn with_datasets(mut self, primary: Option<&str>, compare: Option<&str>) -> Self {
        self.dataset = primary.map(str::to_string);
        self.compare_dataset = compare.map(str::to_string);
        self
    }

    /// Start with the given entry ids collapsed.
    pub fn with_collapsed(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.collapsed.extend(ids);
        self
    }

    /// Add or remove a fork from the selection.
    pub fn toggle_fork(&mut self, fork: impl Into<RevisionLabel>) {
        let fork = fork.into();
        match self.forks.iter().position(|f| *f == fork) {
            Some(index) => {
                self.forks.remove(index);
            }
            None => self.forks.push(fork),
        }
    }

    pub fn fork_selected(&self, fork: &RevisionLabel) -> bool {
        self.forks.is_empty() || self.forks.contains(fork)
    }

    pub fn field_enabled(&self, field: FieldKind) -> bool {
        self.fields.is_empty() || self.fields.contains(&field)
    }

    /// Flip the collapsed state of an entry. Returns the new state.
    pub fn toggle_collapsed(&mut self, id: &str) -> bool {
        if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string());
            true
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// The trimmed, lowercased search query; `None` when blank.
    pub(crate) fn search_needle(&self) -> Option<String> {
        let needle = self.search.trim();
        (!needle.is_empty()).then(|| needle.to_lowercase())
    }
}
