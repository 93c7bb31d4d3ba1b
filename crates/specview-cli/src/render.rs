//! Text rendering for the terminal.

use std::fmt::Write;

use colored::{ColoredString, Colorize};

use specview_diff::{render_lines, DiffLine, DiffSummary, TaggedLine};
use specview_reconcile::{ComparisonRow, ItemChange};
use specview_types::RevisionLabel;
use specview_view::{ForkInfo, ForkTable, VisibleComparison};

const ABSENT: &str = "—";

pub fn fork_badge(table: &ForkTable, label: &RevisionLabel) -> ColoredString {
    match table.get(label.as_str()) {
        Some(info) => {
            let (r, g, b) = rgb(info.color());
            label.as_str().truecolor(r, g, b).bold()
        }
        None => label.as_str().normal(),
    }
}

pub fn render_forks(table: &ForkTable) -> String {
    let mut out = String::new();
    if table.is_empty() {
        out.push_str("No forks.\n");
        return out;
    }
    for ForkInfo { label, known, .. } in table.forks() {
        let note = if *known { "" } else { " (unknown)" };
        let _ = writeln!(out, "  {}{}", fork_badge(table, label), note.dimmed());
    }
    out
}

pub fn render_comparisons(
    table: &ForkTable,
    comparisons: &[VisibleComparison],
    dataset_a: &str,
    dataset_b: Option<&str>,
) -> String {
    let mut out = String::new();
    if comparisons.is_empty() {
        out.push_str("No data.\n");
        return out;
    }
    for comparison in comparisons {
        let _ = writeln!(out, "{}", comparison.name.bold());
        for row in &comparison.rows {
            out.push_str(&render_row(table, row, dataset_a, dataset_b));
        }
    }
    out
}

fn render_row(table: &ForkTable, row: &ComparisonRow, dataset_a: &str, dataset_b: Option<&str>) -> String {
    let ty = row.ty.as_deref().unwrap_or(ABSENT);
    let a = row.value_a.as_deref().unwrap_or(ABSENT);
    let mut line = format!(
        "  {:<12} {:<10} {}: {}",
        fork_badge(table, &row.revision),
        ty.cyan(),
        dataset_a.dimmed(),
        a
    );
    if let Some(dataset_b) = dataset_b {
        let b = row.value_b.as_deref().unwrap_or(ABSENT);
        let b = if row.value_a != row.value_b { b.yellow() } else { b.normal() };
        let _ = write!(line, "  {}: {}", dataset_b.dimmed(), b);
    }
    line.push('\n');
    line
}

pub fn render_item_header(table: &ForkTable, name: &str, changes: &[ItemChange]) -> String {
    let forks: Vec<String> = changes
        .iter()
        .map(|change| fork_badge(table, &change.revision).to_string())
        .collect();
    format!("{}  [{}]\n", name.bold(), forks.join(", "))
}

pub fn render_diff(from: &RevisionLabel, to: &RevisionLabel, lines: &[TaggedLine]) -> String {
    let summary = DiffSummary::of(lines);
    let mut out = format!(
        "  {} {} → {} ({} added, {} removed, {} changed)\n",
        "diff".dimmed(),
        from,
        to,
        summary.added.to_string().green(),
        summary.removed.to_string().red(),
        summary.changed.to_string().yellow(),
    );
    for line in render_lines(lines) {
        let _ = match line {
            DiffLine::Context(text) => writeln!(out, "    {}", text.dimmed()),
            DiffLine::Added(text) => writeln!(out, "  {} {}", "+".green(), text.green()),
            DiffLine::Removed(text) => writeln!(out, "  {} {}", "-".red(), text.red()),
        };
    }
    out
}

pub fn render_value(revision: &RevisionLabel, table: &ForkTable, value: &str) -> String {
    let mut out = format!("  {}\n", fork_badge(table, revision));
    for line in value.split('\n') {
        let _ = writeln!(out, "    {line}");
    }
    out
}

fn rgb(hex: &str) -> (u8, u8, u8) {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .unwrap_or(128)
    };
    (channel(1..3), channel(3..5), channel(5..7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use specview_types::{Artifact, ForkPolicy};

    fn plain() {
        colored::control::set_override(false);
    }

    fn table() -> ForkTable {
        let artifact = Artifact::from_json_str(r#"{"m": {"PHASE0": {}, "ALTAIR": {}, "CUSTOM": {}}}"#).unwrap();
        ForkTable::derive(&artifact, &ForkPolicy::default())
    }

    #[test]
    fn hex_to_rgb() {
        assert_eq!(rgb("#2563eb"), (0x25, 0x63, 0xeb));
        assert_eq!(rgb("bad"), (128, 128, 128));
    }

    #[test]
    fn forks_listed_in_order() {
        plain();
        let out = render_forks(&table());
        let lines: Vec<&str> = out.lines().map(str::trim).collect();
        assert_eq!(lines, vec!["PHASE0", "ALTAIR", "CUSTOM (unknown)"]);
    }

    #[test]
    fn absent_values_rendered_as_dash() {
        plain();
        let comparisons = vec![VisibleComparison {
            name: "FOO".into(),
            rows: vec![ComparisonRow {
                revision: RevisionLabel::new("ALTAIR"),
                ty: Some("uint64".into()),
                value_a: Some("2".into()),
                value_b: None,
            }],
        }];
        let out = render_comparisons(&table(), &comparisons, "mainnet", Some("minimal"));
        assert!(out.starts_with("FOO\n"));
        assert!(out.contains("mainnet: 2"));
        assert!(out.contains("minimal: —"));
    }

    #[test]
    fn empty_comparisons() {
        plain();
        assert_eq!(render_comparisons(&table(), &[], "mainnet", None), "No data.\n");
    }

    #[test]
    fn diff_rendering() {
        plain();
        let lines = specview_diff::compute_line_diff("a\nb", "a\nc");
        let out = render_diff(&RevisionLabel::new("PHASE0"), &RevisionLabel::new("ALTAIR"), &lines);
        assert!(out.contains("PHASE0 → ALTAIR (0 added, 0 removed, 1 changed)"));
        assert!(out.contains("  - b\n"));
        assert!(out.contains("  + c\n"));
        assert!(out.contains("    a\n"));
    }
}
