//! Line diffs between two revisions of an item's text.
//!
//! The default is a positional diff: line `i` of the old text is compared with
//! line `i` of the new one. Insertions that shift later lines make every
//! following line show as changed; [`compute_myers_diff`] is available when an
//! aligned diff is wanted instead.
//!
//! # Key Types
//!
//! - [`TaggedLine`] -- One line tagged unchanged / added / removed / changed
//! - [`DiffLine`] -- Render-ready line (a change expands to removed + added)
//! - [`DiffSummary`] -- Per-tag counts
//! - [`DiffMode`] -- Positional (default) or Myers

pub mod line_diff;
pub mod myers;

pub use line_diff::{compute_line_diff, render_lines, DiffLine, DiffSummary, TaggedLine};
pub use myers::compute_myers_diff;

/// Which algorithm to diff with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffMode {
    /// Line-index comparison.
    #[default]
    Positional,
    /// Minimal edit script via the Myers algorithm.
    Myers,
}

/// Diff `old` against `new` with the chosen mode.
pub fn diff_with_mode(mode: DiffMode, old: &str, new: &str) -> Vec<TaggedLine> {
    match mode {
        DiffMode::Positional => compute_line_diff(old, new),
        DiffMode::Myers => compute_myers_diff(old, new),
    }
}
