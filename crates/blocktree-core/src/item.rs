//! Work item model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A work item as supplied by the item store, plus the two fields computed
/// by the blocking passes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkItem {
    /// Identifier, unique within a snapshot (e.g., "bd-a1b2").
    pub id: String,

    /// Human-readable title.
    #[serde(default)]
    pub title: String,

    /// Current status (e.g., "open", "in_progress", "closed").
    #[serde(default = "default_status")]
    pub status: String,

    /// Priority, 0 being the most urgent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,

    /// Categorization labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Identifiers of items that must complete first, in significant order.
    /// May name items missing from the snapshot, the item itself, or form cycles.
    #[serde(default, alias = "blockedBy", skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,

    /// Identifiers of items this one blocks, as reported by the store.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,

    /// Creation timestamp (ISO 8601 UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Hidden from active work until this moment.
    #[serde(default, alias = "deferUntil", skip_serializing_if = "Option::is_none")]
    pub defer_until: Option<DateTime<Utc>>,

    /// Longer free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Working notes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Longest chain of blockers ending at this item. Overwritten on every pass.
    #[serde(default, alias = "blockingDepth")]
    pub blocking_depth: usize,

    /// Box-drawing prefix for tree rendering; empty for forest roots.
    #[serde(default, alias = "treePrefix", skip_serializing_if = "String::is_empty")]
    pub tree_prefix: String,
}

fn default_status() -> String {
    "open".to_string()
}

impl WorkItem {
    /// Create a new work item with only an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            status: default_status(),
            priority: None,
            labels: Vec::new(),
            blocked_by: Vec::new(),
            blocks: Vec::new(),
            created_at: None,
            defer_until: None,
            description: String::new(),
            notes: String::new(),
            blocking_depth: 0,
            tree_prefix: String::new(),
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Defer the item until the given moment.
    #[must_use]
    pub fn deferred_until(mut self, until: DateTime<Utc>) -> Self {
        self.defer_until = Some(until);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Add labels to the work item.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the blocker list, keeping the given order.
    #[must_use]
    pub fn blocked_by(mut self, blockers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.blocked_by = blockers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the reverse (blocks) list.
    #[must_use]
    pub fn blocks(mut self, blocked: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.blocks = blocked.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether the item lists any blocker at all, known or not.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        !self.blocked_by.is_empty()
    }

    /// Check whether the item is deferred past `now`.
    #[must_use]
    pub fn is_deferred(&self, now: DateTime<Utc>) -> bool {
        self.defer_until.is_some_and(|until| until > now)
    }

    /// Short display form of a priority, e.g. `P1`, or `P-` when unset.
    #[must_use]
    pub fn priority_label(&self) -> String {
        self.priority
            .map_or_else(|| "P-".to_string(), |p| format!("P{p}"))
    }

    /// Check if the item has a specific label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }
}

impl Default for WorkItem {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_work_item() {
        let item = WorkItem::new("bd-1");

        assert_eq!(item.id, "bd-1");
        assert_eq!(item.status, "open");
        assert!(item.blocked_by.is_empty());
        assert_eq!(item.blocking_depth, 0);
        assert!(item.tree_prefix.is_empty());
        assert!(!item.is_blocked());
    }

    #[test]
    fn test_builder_pattern() {
        let item = WorkItem::new("bd-2")
            .with_title("Wire up login")
            .with_status("in_progress")
            .with_priority(1)
            .with_labels(["backend"])
            .blocked_by(["bd-1", "ext-9"]);

        assert_eq!(item.title, "Wire up login");
        assert_eq!(item.status, "in_progress");
        assert_eq!(item.priority_label(), "P1");
        assert!(item.has_label("BACKEND"));
        assert_eq!(item.blocked_by, vec!["bd-1", "ext-9"]);
        assert!(item.is_blocked());
    }

    #[test]
    fn test_deserialize_accepts_camel_case_blockers() {
        let item: WorkItem =
            serde_json::from_str(r#"{"id":"b","blockedBy":["a"],"blockingDepth":7}"#).unwrap();

        assert_eq!(item.blocked_by, vec!["a"]);
        assert_eq!(item.blocking_depth, 7);
        assert_eq!(item.status, "open");
        assert_eq!(item.priority_label(), "P-");
    }

    #[test]
    fn test_deferred_only_while_in_future() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let item = WorkItem::new("a").deferred_until(now + Duration::hours(2));

        assert!(item.is_deferred(now));
        assert!(!item.is_deferred(now + Duration::hours(2)));
        assert!(!WorkItem::new("b").is_deferred(now));
    }

    #[test]
    fn test_deserialize_defer_and_notes() {
        let item: WorkItem = serde_json::from_str(
            r#"{"id":"a","deferUntil":"2024-05-02T00:00:00Z","description":"why","notes":"n"}"#,
        )
        .unwrap();

        assert_eq!(
            item.defer_until,
            Some(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(item.description, "why");
        assert_eq!(item.notes, "n");
    }

    #[test]
    fn test_serialize_skips_empty_prefix() {
        let json = serde_json::to_string(&WorkItem::new("a")).unwrap();

        assert!(json.contains(r#""blocking_depth":0"#));
        assert!(!json.contains("tree_prefix"));
        assert!(!json.contains("blocked_by"));
    }
}
