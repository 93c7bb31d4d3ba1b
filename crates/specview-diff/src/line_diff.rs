//! Positional line diff.

use serde::{Deserialize, Serialize};

/// One line of a diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "text", rename_all = "snake_case")]
pub enum TaggedLine {
    /// Present and equal on both sides.
    Unchanged(String),
    /// Present only in the new text.
    Added(String),
    /// Present only in the old text.
    Removed(String),
    /// Present on both sides at the same index, but different.
    Changed { old: String, new: String },
}

/// A render-ready diff line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Per-tag line counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Lines equal in both texts.
    pub unchanged: usize,
    /// Lines only in the new text.
    pub added: usize,
    /// Lines only in the old text.
    pub removed: usize,
    /// Lines replaced in place.
    pub changed: usize,
}

impl DiffSummary {
    pub fn of(lines: &[TaggedLine]) -> Self {
        let mut summary = Self::default();
        for line in lines {
            match line {
                TaggedLine::Unchanged(_) => summary.unchanged += 1,
                TaggedLine::Added(_) => summary.added += 1,
                TaggedLine::Removed(_) => summary.removed += 1,
                TaggedLine::Changed { .. } => summary.changed += 1,
            }
        }
        summary
    }

    /// Returns `true` if no line differs.
    pub fn is_identical(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.changed == 0
    }
}

/// Compare `old` and `new` line by line at equal indices.
///
/// Both texts are split on `'\n'` (so an empty text is one empty line and a
/// trailing newline yields a final empty line). Indices past the end of one
/// side are tagged added or removed.
pub fn compute_line_diff(old: &str, new: &str) -> Vec<TaggedLine> {
    let old_lines: Vec<&str> = old.split('\n').collect();
    let new_lines: Vec<&str> = new.split('\n').collect();
    let mut lines = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    for (o, n) in old_lines.iter().zip(&new_lines) {
        if o == n {
            lines.push(TaggedLine::Unchanged(o.to_string()));
        } else {
            lines.push(TaggedLine::Changed {
                old: o.to_string(),
                new: n.to_string(),
            });
        }
    }
    lines.extend(
        old_lines
            .iter()
            .skip(new_lines.len())
            .map(|o| TaggedLine::Removed(o.to_string())),
    );
    lines.extend(
        new_lines
            .iter()
            .skip(old_lines.len())
            .map(|n| TaggedLine::Added(n.to_string())),
    );
    lines
}

/// Expand tagged lines for display: a changed line becomes its removed line
/// followed by its added line.
pub fn render_lines(lines: &[TaggedLine]) -> Vec<DiffLine> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        match line {
            TaggedLine::Unchanged(text) => out.push(DiffLine::Context(text.clone())),
            TaggedLine::Added(text) => out.push(DiffLine::Added(text.clone())),
            TaggedLine::Removed(text) => out.push(DiffLine::Removed(text.clone())),
            TaggedLine::Changed { old, new } => {
                out.push(DiffLine::Removed(old.clone()));
                out.push(DiffLine::Added(new.clone()));
            }
        }
    }
    out
}
