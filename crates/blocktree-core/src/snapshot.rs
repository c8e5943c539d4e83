//! Reading work item snapshots.
//!
//! Accepted shapes:
//! - a JSON or YAML list of items
//! - a JSON or YAML object holding the list under `items`, `issues` or `tasks`
//! - newline-delimited JSON, one item per line

use crate::error::{CoreError, Result};
use crate::item::WorkItem;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Snapshot encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Pick by file extension, then by content.
    #[default]
    Auto,
    /// JSON document.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
    /// YAML document.
    Yaml,
}

impl FromStr for SnapshotFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(CoreError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Json => write!(f, "json"),
            Self::Ndjson => write!(f, "ndjson"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl SnapshotFormat {
    /// Format implied by a file extension, `Auto` when unknown.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or(Self::Auto)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    List(Vec<WorkItem>),
    Wrapped {
        #[serde(alias = "issues", alias = "tasks")]
        items: Vec<WorkItem>,
    },
}

impl Document {
    fn into_items(self) -> Vec<WorkItem> {
        match self {
            Self::List(items) | Self::Wrapped { items } => items,
        }
    }
}

/// Parse a snapshot from text.
///
/// # Errors
/// Returns an error if the content does not decode as a list of work items
/// in the requested format.
pub fn parse(content: &str, format: SnapshotFormat) -> Result<Vec<WorkItem>> {
    let trimmed = content.trim_start();

    match format {
        SnapshotFormat::Json => Ok(serde_json::from_str::<Document>(content)?.into_items()),
        SnapshotFormat::Yaml => Ok(serde_yaml::from_str::<Document>(content)?.into_items()),
        SnapshotFormat::Ndjson => parse_ndjson(content),
        SnapshotFormat::Auto if trimmed.is_empty() => Ok(Vec::new()),
        SnapshotFormat::Auto if trimmed.starts_with('[') => parse(content, SnapshotFormat::Json),
        SnapshotFormat::Auto if trimmed.starts_with('{') => {
            match serde_json::from_str::<Document>(content) {
                Ok(doc) => Ok(doc.into_items()),
                Err(e) => {
                    debug!(error = %e, "Not a single JSON document, trying NDJSON");
                    parse_ndjson(content)
                }
            }
        }
        SnapshotFormat::Auto => parse(content, SnapshotFormat::Yaml),
    }
}

fn parse_ndjson(content: &str) -> Result<Vec<WorkItem>> {
    let mut items = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let item: WorkItem = serde_json::from_str(line).map_err(|e| {
            CoreError::InvalidSnapshot(format!("line {}: {e}", lineno + 1))
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Read a snapshot from any reader (e.g. stdin).
///
/// # Errors
/// Returns an error if reading fails or the content cannot be parsed.
pub fn read(mut reader: impl Read, format: SnapshotFormat) -> Result<Vec<WorkItem>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse(&content, format)
}

/// Load a snapshot file. With `SnapshotFormat::Auto` the extension decides
/// first, then the content.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: impl AsRef<Path>, format: SnapshotFormat) -> Result<Vec<WorkItem>> {
    let path = path.as_ref();
    let format = match format {
        SnapshotFormat::Auto => SnapshotFormat::from_path(path),
        explicit => explicit,
    };

    let content = fs::read_to_string(path)?;
    let items = parse(&content, format)?;

    debug!(path = %path.display(), format = %format, items = items.len(), "Loaded snapshot");

    Ok(items)
}
