//! Fork table derived from a loaded artifact.
//!
//! Built once after loading and passed to whatever needs fork order or
//! colours; nothing reads fork metadata from ambient state.

use serde::Serialize;
use tracing::debug;

use specview_types::{Artifact, ForkPolicy, RevisionLabel};

/// Display colours, assigned by position.
pub const PALETTE: &[&str] = &[
    "#6b7280", "#2563eb", "#16a34a", "#d97706", "#9333ea", "#dc2626", "#0891b2", "#db2777",
    "#65a30d", "#4f46e5",
];

/// One included fork.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForkInfo {
    /// Normalized fork label.
    pub label: RevisionLabel,
    /// Whether the fork is in the policy's known order.
    pub known: bool,
    /// Index into [`PALETTE`].
    pub color_index: usize,
}

impl ForkInfo {
    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index % PALETTE.len()]
    }
}

/// Included forks present in an artifact, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ForkTable {
    forks: Vec<ForkInfo>,
}

impl ForkTable {
    /// Collect every included revision label across all datasets and order
    /// it chronologically.
    ///
    /// A known fork takes the colour at its index in the known order, so its
    /// colour does not depend on which other forks the artifact carries.
    /// Unknown forks continue the cycle after the known ones.
    pub fn derive(artifact: &Artifact, policy: &ForkPolicy) -> Self {
        let mut labels: Vec<RevisionLabel> = Vec::new();
        for label in artifact.revision_labels() {
            if !policy.is_included(label) {
                continue;
            }
            let label = RevisionLabel::new(label);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        policy.sort_ascending(&mut labels);

        let mut next_unknown = policy.known_order.len();
        let forks: Vec<ForkInfo> = labels
            .into_iter()
            .map(|label| match policy.position(label.as_str()) {
                Some(index) => ForkInfo {
                    label,
                    known: true,
                    color_index: index,
                },
                None => {
                    let color_index = next_unknown;
                    next_unknown += 1;
                    ForkInfo {
                        label,
                        known: false,
                        color_index,
                    }
                }
            })
            .collect();

        debug!(forks = forks.len(), "fork table derived");
        Self { forks }
    }

    pub fn forks(&self) -> &[ForkInfo] {
        &self.forks
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&ForkInfo> {
        self.forks.iter().find(|fork| fork.label == *label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &RevisionLabel> {
        self.forks.iter().map(|fork| &fork.label)
    }

    /// The newest fork, the usual default selection.
    pub fn latest(&self) -> Option<&ForkInfo> {
        self.forks.last()
    }
}
