//! CLI command implementations.

use crate::config::Config;
use crate::output::{self, DepthRow, OutputFormat};
use anyhow::{bail, Context, Result};
use blocktree_core::{annotate, apply_blocking_depth, snapshot, WorkItem};
use std::io;
use std::path::Path;
use tracing::info;

/// Read the snapshot named on the command line, or the configured default.
/// `-` reads stdin.
fn load_snapshot(file: Option<&Path>, config: &Config) -> Result<Vec<WorkItem>> {
    let path = match file.or(config.snapshot.path.as_deref()) {
        Some(path) => path,
        None => bail!("No snapshot file given and none configured"),
    };

    let items = if path == Path::new("-") {
        snapshot::read(io::stdin().lock(), config.snapshot.format)
            .context("Failed to read snapshot from stdin")?
    } else {
        snapshot::load(path, config.snapshot.format)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?
    };

    info!(items = items.len(), "Loaded work items");
    Ok(items)
}

/// Print the snapshot as a blocking tree.
pub fn tree(file: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let items = load_snapshot(file, config)?;
    if items.is_empty() {
        output::print_success("No work items found", format);
        return Ok(());
    }

    let ordered = annotate(items);
    output::print_tree(&ordered, &config.display, format)
}

/// Print blocking depth per item, in snapshot order.
pub fn depth(file: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let mut items = load_snapshot(file, config)?;
    if items.is_empty() {
        output::print_success("No work items found", format);
        return Ok(());
    }

    apply_blocking_depth(&mut items);

    let rows: Vec<DepthRow> = items.iter().map(DepthRow::from).collect();
    output::print_list(&rows, format)
}

/// Show one item with its blockers resolved against the snapshot.
pub fn show(id: &str, file: Option<&Path>, config: &Config, format: OutputFormat) -> Result<()> {
    let mut items = load_snapshot(file, config)?;
    apply_blocking_depth(&mut items);

    let Some(item) = items.iter().find(|i| i.id == id) else {
        bail!("Work item not found: {id}");
    };

    output::print_item_detail(item, &items, format)
}
