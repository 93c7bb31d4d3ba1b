use std::cmp::Ordering;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, warn};

use specview_diff::{diff_with_mode, DiffMode, TaggedLine};
use specview_reconcile::{
    item_change_pairs, item_value_at, reconcile_items_with, reconcile_variables_with, ItemChange,
    VariableSet,
};
use specview_types::{Artifact, FieldKind, ForkPolicy, RevisionLabel, RevisionMap};
use specview_view::{
    compute_visible_comparisons, compute_visible_items, DeepLink, ForkTable, ViewState,
};

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let policy = match &cli.config {
        Some(path) => ForkPolicy::load(path)
            .with_context(|| format!("failed to load fork policy {}", path.display()))?,
        None => ForkPolicy::default(),
    };
    let output = match cli.command {
        Command::Forks(args) => cmd_forks(&policy, cli.format, args)?,
        Command::Vars(args) => cmd_vars(&policy, cli.format, args)?,
        Command::Items(args) => cmd_items(&policy, cli.format, args)?,
        Command::Show(args) => cmd_show(&policy, cli.format, args)?,
    };
    print!("{output}");
    Ok(())
}

/// Diff between two consecutive changes of one item.
#[derive(Debug, Serialize)]
struct RevisionDiff {
    from: RevisionLabel,
    to: RevisionLabel,
    lines: Vec<TaggedLine>,
}

#[derive(Debug, Serialize)]
struct ItemReport<'a> {
    name: &'a str,
    changes: &'a [ItemChange],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diffs: Vec<RevisionDiff>,
}

fn load_artifact(path: &Path) -> anyhow::Result<Artifact> {
    Artifact::load(path).with_context(|| format!("failed to load artifact {}", path.display()))
}

/// Resolve a dataset by name, falling back to the first one. A missing
/// dataset shows as no data rather than an error.
fn resolve_dataset<'a>(artifact: &'a Artifact, name: Option<&str>) -> (String, Option<&'a RevisionMap>) {
    let name = match name.or_else(|| artifact.default_dataset()) {
        Some(name) => name.to_string(),
        None => return (String::from("(none)"), None),
    };
    let dataset = artifact.dataset(&name);
    if dataset.is_none() {
        warn!(dataset = %name, "dataset not found in artifact");
    }
    (name, dataset)
}

fn view_state(filter: &FilterArgs, field: FieldKind, compare: Option<&str>) -> ViewState {
    ViewState::new()
        .with_search(filter.search.clone().unwrap_or_default())
        .with_forks(filter.forks.iter().map(String::as_str))
        .with_fields([field])
        .with_datasets(filter.dataset.as_deref(), compare)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn diff_mode(myers: bool) -> DiffMode {
    if myers {
        DiffMode::Myers
    } else {
        DiffMode::Positional
    }
}

fn diffs_for(changes: &[ItemChange], mode: DiffMode) -> Vec<RevisionDiff> {
    item_change_pairs(changes)
        .map(|(old, new)| RevisionDiff {
            from: old.revision.clone(),
            to: new.revision.clone(),
            lines: diff_with_mode(mode, &old.value, &new.value),
        })
        .collect()
}

fn cmd_forks(policy: &ForkPolicy, format: OutputFormat, args: ForksArgs) -> anyhow::Result<String> {
    let artifact = load_artifact(&args.artifact)?;
    let table = ForkTable::derive(&artifact, policy);
    match format {
        OutputFormat::Json => to_json(&table),
        OutputFormat::Text => Ok(render::render_forks(&table)),
    }
}

fn cmd_vars(policy: &ForkPolicy, format: OutputFormat, args: VarsArgs) -> anyhow::Result<String> {
    if !args.field.is_variable() {
        bail!("{} is not a variable field; use `specview items`", args.field);
    }
    let artifact = load_artifact(&args.artifact)?;
    let table = ForkTable::derive(&artifact, policy);
    let state = view_state(&args.filter, args.field, args.compare.as_deref());

    let (name_a, dataset_a) = resolve_dataset(&artifact, state.dataset.as_deref());
    let set_a = reconcile_variables_with(policy, dataset_a, args.field);
    let (name_b, set_b) = match state.compare_dataset.as_deref() {
        Some(name) => {
            let (name, dataset) = resolve_dataset(&artifact, Some(name));
            (Some(name), reconcile_variables_with(policy, dataset, args.field))
        }
        None => (None, VariableSet::default()),
    };

    let comparisons = compute_visible_comparisons(policy, &set_a, &set_b, &state);
    debug!(field = %args.field, shown = comparisons.len(), "vars");
    match format {
        OutputFormat::Json => to_json(&comparisons),
        OutputFormat::Text => Ok(render::render_comparisons(
            &table,
            &comparisons,
            &name_a,
            name_b.as_deref(),
        )),
    }
}

fn cmd_items(policy: &ForkPolicy, format: OutputFormat, args: ItemsArgs) -> anyhow::Result<String> {
    if args.field.is_variable() {
        bail!("{} is a variable field; use `specview vars`", args.field);
    }
    let artifact = load_artifact(&args.artifact)?;
    let table = ForkTable::derive(&artifact, policy);
    let mut state = view_state(&args.filter, args.field, None).with_collapsed(
        args.collapsed
            .iter()
            .map(|name| DeepLink::new(args.field, name.as_str()).entry_id()),
    );
    state.show_diffs = args.diff;

    let (_, dataset) = resolve_dataset(&artifact, state.dataset.as_deref());
    let history = reconcile_items_with(policy, dataset, args.field);
    let visible = compute_visible_items(&history, &state);
    let mode = diff_mode(args.myers);

    let reports: Vec<ItemReport<'_>> = visible
        .iter()
        .map(|item| {
            let expanded = !state.is_collapsed(&DeepLink::new(args.field, item.name).entry_id());
            ItemReport {
                name: item.name,
                changes: item.changes,
                diffs: if state.show_diffs && expanded {
                    diffs_for(item.changes, mode)
                } else {
                    Vec::new()
                },
            }
        })
        .collect();

    match format {
        OutputFormat::Json => to_json(&reports),
        OutputFormat::Text => {
            if reports.is_empty() {
                return Ok("No data.\n".to_string());
            }
            let mut out = String::new();
            for report in &reports {
                out.push_str(&render::render_item_header(&table, report.name, report.changes));
                for diff in &report.diffs {
                    out.push_str(&render::render_diff(&diff.from, &diff.to, &diff.lines));
                }
            }
            Ok(out)
        }
    }
}

fn cmd_show(policy: &ForkPolicy, format: OutputFormat, args: ShowArgs) -> anyhow::Result<String> {
    let link = DeepLink::parse(&args.link)?;
    let artifact = load_artifact(&args.artifact)?;
    let table = ForkTable::derive(&artifact, policy);
    let state = ViewState::new()
        .with_fields([link.field])
        .with_datasets(args.dataset.as_deref(), args.compare.as_deref());
    let (name_a, dataset_a) = resolve_dataset(&artifact, state.dataset.as_deref());

    if link.field.is_variable() {
        let set_a = reconcile_variables_with(policy, dataset_a, link.field);
        let (name_b, set_b) = match state.compare_dataset.as_deref() {
            Some(name) => {
                let (name, dataset) = resolve_dataset(&artifact, Some(name));
                (Some(name), reconcile_variables_with(policy, dataset, link.field))
            }
            None => (None, VariableSet::default()),
        };
        let mut comparisons = compute_visible_comparisons(policy, &set_a, &set_b, &state);
        comparisons.retain(|c| c.name == link.name);
        if comparisons.is_empty() {
            bail!("{} not found in dataset {}", link, name_a);
        }
        if let Some(fork) = &link.fork {
            for comparison in &mut comparisons {
                // Rows are newest first, so the first one not after `fork` is in effect.
                let Some(index) = comparison.rows.iter().position(|row| {
                    policy.compare_ascending(row.revision.as_str(), fork.as_str()) != Ordering::Greater
                }) else {
                    bail!("{} does not exist yet at {}", link.name, fork);
                };
                comparison.rows = vec![comparison.rows.swap_remove(index)];
            }
        }
        return match format {
            OutputFormat::Json => to_json(&comparisons),
            OutputFormat::Text => Ok(render::render_comparisons(
                &table,
                &comparisons,
                &name_a,
                name_b.as_deref(),
            )),
        };
    }

    let history = reconcile_items_with(policy, dataset_a, link.field);
    let Some(changes) = history.get(&link.name) else {
        bail!("{} not found in dataset {}", link, name_a);
    };
    let shown: &[ItemChange] = match &link.fork {
        Some(fork) => {
            let Some(current) = item_value_at(policy, changes, fork) else {
                bail!("{} does not exist yet at {}", link.name, fork);
            };
            let index = changes
                .iter()
                .position(|change| change == current)
                .unwrap_or_default();
            &changes[index.saturating_sub(1)..=index]
        }
        None => changes,
    };

    let report = ItemReport {
        name: &link.name,
        changes: shown,
        diffs: diffs_for(shown, diff_mode(args.myers)),
    };
    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Text => {
            let mut out = render::render_item_header(&table, report.name, changes);
            if let Some(latest) = shown.last() {
                out.push_str(&render::render_value(&latest.revision, &table, &latest.value));
            }
            for diff in &report.diffs {
                out.push_str(&render::render_diff(&diff.from, &diff.to, &diff.lines));
            }
            if link.fork.is_none() && report.diffs.is_empty() {
                out.push_str(&format!("  {}\n", "unchanged since introduction".dimmed()));
            }
            Ok(out)
        }
    }
}
