//! CLI configuration.

use anyhow::{Context, Result};
use blocktree_core::SnapshotFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file looked up in the current directory.
pub const CONFIG_FILE: &str = "blocktree.yml";

/// Configuration stored in `blocktree.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Rendering settings.
    #[serde(default)]
    pub display: DisplaySettings,

    /// Where snapshots come from when none is named on the command line.
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

const fn default_version() -> u32 {
    1
}

/// Rendering settings for the human tree output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Show the blocking depth column.
    #[serde(default = "default_true")]
    pub show_depth: bool,

    /// Append "(blocked by ...)" to unprefixed items that have blockers.
    #[serde(default = "default_true")]
    pub show_blocked_suffix: bool,

    /// Line width budget; titles are truncated to fit.
    #[serde(default)]
    pub width: Option<usize>,
}

const fn default_true() -> bool {
    true
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_depth: true,
            show_blocked_suffix: true,
            width: None,
        }
    }
}

/// Snapshot source defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Default snapshot file.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Snapshot encoding.
    #[serde(default)]
    pub format: SnapshotFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            display: DisplaySettings::default(),
            snapshot: SnapshotSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or from `blocktree.yml` in
    /// `dir` when present, or fall back to defaults.
    ///
    /// # Errors
    /// Returns error if an explicit file is missing or any file is invalid.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = dir.join(CONFIG_FILE);
                if !candidate.exists() {
                    debug!("No config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        debug!(path = %path.display(), "Loaded config");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(None, tmp.path()).unwrap();

        assert_eq!(config, Config::default());
        assert!(config.display.show_depth);
        assert_eq!(config.snapshot.format, SnapshotFormat::Auto);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "display:\n  width: 60\nsnapshot:\n  path: issues.jsonl\n  format: ndjson\n",
        )
        .unwrap();

        let config = Config::load(None, tmp.path()).unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.display.width, Some(60));
        assert!(config.display.show_blocked_suffix);
        assert_eq!(config.snapshot.path, Some(PathBuf::from("issues.jsonl")));
        assert_eq!(config.snapshot.format, SnapshotFormat::Ndjson);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.yml");

        assert!(Config::load(Some(missing.as_path()), tmp.path()).is_err());
    }
}
