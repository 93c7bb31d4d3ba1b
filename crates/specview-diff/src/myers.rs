//! Aligned line diff using the `similar` crate (Myers algorithm).

use similar::{ChangeTag, TextDiff};

use crate::line_diff::TaggedLine;

/// Compute an aligned line diff between `old` and `new`.
///
/// Unlike the positional diff, inserted or deleted lines do not disturb the
/// lines around them. Output uses only the unchanged, added and removed tags.
///
/// Lines are split with [`str::lines`], so `\n` and `\r\n` endings compare
/// equal and a trailing newline does not add an empty line.
pub fn compute_myers_diff(old: &str, new: &str) -> Vec<TaggedLine> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let text_diff = TextDiff::from_slices(&old_lines, &new_lines);
    text_diff
        .iter_all_changes()
        .map(|change| {
            let text = change.value().to_string();
            match change.tag() {
                ChangeTag::Equal => TaggedLine::Unchanged(text),
                ChangeTag::Delete => TaggedLine::Removed(text),
                ChangeTag::Insert => TaggedLine::Added(text),
            }
        })
        .collect()
}
