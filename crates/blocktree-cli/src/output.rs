//! Output formatting for the CLI.

use crate::config::DisplaySettings;
use anyhow::{Context, Result};
use blocktree_core::{unresolved_blockers, GraphIndex, WorkItem};
use chrono::{DateTime, Utc};
use console::{measure_text_width, pad_str, style, truncate_str, Alignment};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// Print a list in the specified format.
pub fn print_list<T: Serialize + HumanDisplay>(values: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for value in values {
                println!("{}", value.human_display());
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(values).context("Failed to serialize to JSON")?
            );
        }
        OutputFormat::Yaml => {
            println!(
                "{}",
                serde_yaml::to_string(values).context("Failed to serialize to YAML")?
            );
        }
    }
    Ok(())
}

/// Print a status message.
pub fn print_success(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Human => println!("{message}"),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "status": "ok", "message": message }));
        }
        OutputFormat::Yaml => {
            println!("status: ok\nmessage: {message}");
        }
    }
}

/// Trait for human-readable display.
pub trait HumanDisplay {
    fn human_display(&self) -> String;
}

/// Print the ordered tree. Items must already be annotated.
pub fn print_tree(items: &[WorkItem], display: &DisplaySettings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if items.is_empty() {
                println!("No work items found.");
                return Ok(());
            }
            let id_width = items.iter().map(|i| measure_text_width(&i.id)).max().unwrap_or(2);
            let now = Utc::now();
            for item in items {
                println!("{}", format_tree_line(item, id_width, display, now));
            }
            Ok(())
        }
        _ => print_list(items, format),
    }
}

const MARKER_WIDTH: usize = 2;

/// One tree row: ` marker priority id [depth] prefix+title (suffix)`.
fn format_tree_line(
    item: &WorkItem,
    id_width: usize,
    display: &DisplaySettings,
    now: DateTime<Utc>,
) -> String {
    let blocked = item.is_blocked();
    let deferred = item.is_deferred(now);
    let marker = if blocked {
        "⛔"
    } else if deferred {
        "⏳"
    } else {
        " "
    };
    let marker_text = pad_str(marker, MARKER_WIDTH, Alignment::Left, None);
    let id = pad_str(&item.id, id_width, Alignment::Left, None);

    let mut lead = format!(" {marker_text} {} {id} ", item.priority_label());
    if display.show_depth {
        write!(lead, "d{:<2} ", item.blocking_depth).ok();
    }

    let mut parts = Vec::new();
    if let Some(until) = item.defer_until.filter(|_| deferred) {
        parts.push(format!("({})", format_relative_time(until, now)));
    }
    if display.show_blocked_suffix && blocked && item.tree_prefix.is_empty() {
        let ids: Vec<&str> = item.blocked_by.iter().map(|b| short_id(b)).collect();
        parts.push(format!("(blocked by {})", ids.join(", ")));
    }
    let mut suffix = if parts.is_empty() {
        String::new()
    } else {
        format!(" {}", parts.join(" "))
    };

    let mut title = item.title.clone();
    if let Some(width) = display.width {
        let lead_width = measure_text_width(&lead);
        let prefix_width = measure_text_width(&item.tree_prefix);
        let title_budget = width
            .saturating_sub(lead_width)
            .saturating_sub(measure_text_width(&suffix))
            .saturating_sub(prefix_width);
        title = fit(&title, title_budget);

        let remaining = width.saturating_sub(lead_width + prefix_width + measure_text_width(&title));
        if measure_text_width(&suffix) > remaining {
            let trimmed = fit(suffix.trim_start(), remaining.saturating_sub(1));
            suffix = if trimmed.is_empty() {
                String::new()
            } else {
                format!(" {trimmed}")
            };
        }
    }

    let mut text = format!("{}{title}", item.tree_prefix);
    if deferred {
        text = style(text).dim().to_string();
    }
    if !suffix.is_empty() {
        suffix = style(suffix).dim().to_string();
    }

    let line = format!("{lead}{text}{suffix}");
    match display.width {
        Some(width) => truncate_str(&line, width, "").into_owned(),
        None => line,
    }
}

/// Truncate to `budget` columns with an ellipsis; nothing fits in zero columns.
fn fit(text: &str, budget: usize) -> String {
    if budget == 0 {
        return String::new();
    }
    truncate_str(text, budget, "…").into_owned()
}

/// Last dash-separated segment of an id (`bd-a1b2` -> `a1b2`).
fn short_id(id: &str) -> &str {
    match id.rfind('-') {
        Some(dash) if dash > 0 && dash + 1 < id.len() => &id[dash + 1..],
        _ => id,
    }
}

/// Compact distance between `target` and `now`, e.g. `in 5m` or `2d ago`.
fn format_relative_time(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const SECOND: u64 = 1_000;
    const MINUTE: u64 = 60 * SECOND;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let delta = (target - now).num_milliseconds();
    let abs = delta.unsigned_abs();

    let (value, unit) = if abs >= 48 * HOUR {
        (abs.div_ceil(DAY), "d")
    } else if abs >= 90 * MINUTE {
        (abs.div_ceil(HOUR), "h")
    } else if abs >= 90 * SECOND {
        (abs.div_ceil(MINUTE), "m")
    } else {
        (abs.div_ceil(SECOND).max(1), "s")
    };

    if delta >= 0 {
        format!("in {value}{unit}")
    } else {
        format!("{value}{unit} ago")
    }
}

/// Depth of one item, for the `depth` command.
#[derive(Debug, Serialize)]
pub struct DepthRow {
    pub id: String,
    pub blocking_depth: usize,
    pub blocked_by: Vec<String>,
}

impl From<&WorkItem> for DepthRow {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id.clone(),
            blocking_depth: item.blocking_depth,
            blocked_by: item.blocked_by.clone(),
        }
    }
}

impl HumanDisplay for DepthRow {
    fn human_display(&self) -> String {
        if self.blocked_by.is_empty() {
            format!("{:<24} {}", self.id, self.blocking_depth)
        } else {
            format!(
                "{:<24} {}  <- {}",
                self.id,
                self.blocking_depth,
                self.blocked_by.join(", ")
            )
        }
    }
}

impl HumanDisplay for WorkItem {
    fn human_display(&self) -> String {
        let mut out = String::new();

        writeln!(out, "ID:        {}", self.id).ok();
        writeln!(out, "Title:     {}", self.title).ok();
        writeln!(out, "Status:    {}", self.status).ok();
        writeln!(out, "Priority:  {}", self.priority_label()).ok();
        writeln!(out, "Depth:     {}", self.blocking_depth).ok();

        if !self.labels.is_empty() {
            writeln!(out, "Labels:    {}", self.labels.join(", ")).ok();
        }

        if let Some(created) = &self.created_at {
            writeln!(out, "Created:   {}", format_time(created)).ok();
        }

        if let Some(until) = self.defer_until.filter(|_| self.is_deferred(Utc::now())) {
            writeln!(out, "Deferred:  until {}", until.format("%Y-%m-%d")).ok();
        }

        for (label, text) in [("Description:", &self.description), ("Notes:", &self.notes)] {
            if !text.is_empty() {
                writeln!(out, "\n{label}\n{text}").ok();
            }
        }

        out
    }
}

fn format_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Print one item with its blocker relationships resolved against the snapshot.
pub fn print_item_detail(item: &WorkItem, snapshot: &[WorkItem], format: OutputFormat) -> Result<()> {
    let index = GraphIndex::build(snapshot);
    let unknown = unresolved_blockers(item, &index);

    match format {
        OutputFormat::Human => {
            print!("{}", item.human_display());

            if !item.blocked_by.is_empty() {
                let titles: HashMap<&str, &str> = snapshot
                    .iter()
                    .map(|i| (i.id.as_str(), i.title.as_str()))
                    .collect();

                println!();
                println!("{}", style("Blocked by:").bold());
                for id in &item.blocked_by {
                    match titles.get(id.as_str()) {
                        Some(title) if !title.is_empty() => println!("  - {id} {title}"),
                        Some(_) => println!("  - {id}"),
                        None => println!("  - {id} {}", style("(not in snapshot)").dim()),
                    }
                }
            }

            if !item.blocks.is_empty() {
                println!();
                println!("{}", style("Blocks:").bold());
                for id in &item.blocks {
                    println!("  - {id}");
                }
            }
            Ok(())
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ItemDetail<'a> {
                #[serde(flatten)]
                item: &'a WorkItem,
                unresolved_blockers: Vec<&'a str>,
            }

            let output = ItemDetail {
                item,
                unresolved_blockers: unknown,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialize to JSON")?
            );
            Ok(())
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yaml::to_string(item).context("Failed to serialize to YAML")?
            );
            if !unknown.is_empty() {
                println!("unresolved_blockers:");
                for id in unknown {
                    println!("  - {id}");
                }
            }
            Ok(())
        }
    }
}
