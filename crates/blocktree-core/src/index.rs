//! Identifier index over a snapshot.

use crate::item::WorkItem;
use std::collections::HashMap;

/// Maps each identifier to the position of its first occurrence in the
/// snapshot. Positions are the dense node numbers used by the depth and
/// forest passes.
///
/// Duplicate identifiers keep the first-seen position; later duplicates
/// are still nodes of their own but are never the target of a lookup.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex<'a> {
    positions: HashMap<&'a str, usize>,
    len: usize,
}

impl<'a> GraphIndex<'a> {
    /// Index a snapshot.
    #[must_use]
    pub fn build(items: &'a [WorkItem]) -> Self {
        let mut positions = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            positions.entry(item.id.as_str()).or_insert(pos);
        }
        Self {
            positions,
            len: items.len(),
        }
    }

    /// Position of the first item with this identifier.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Whether an item with this identifier is part of the snapshot.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of items in the indexed snapshot, duplicates included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the indexed snapshot was empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Blockers of `item` that are not part of the indexed snapshot, in list order.
#[must_use]
pub fn unresolved_blockers<'i>(item: &'i WorkItem, index: &GraphIndex<'_>) -> Vec<&'i str> {
    item.blocked_by
        .iter()
        .map(String::as_str)
        .filter(|id| !index.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup() {
        let items = vec![WorkItem::new("a"), WorkItem::new("b")];
        let index = GraphIndex::build(&items);

        assert_eq!(index.position("a"), Some(0));
        assert_eq!(index.position("b"), Some(1));
        assert_eq!(index.position("zzz"), None);
        assert!(index.contains("b"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let items = vec![WorkItem::new("a"), WorkItem::new("b"), WorkItem::new("a")];
        let index = GraphIndex::build(&items);

        assert_eq!(index.position("a"), Some(0));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let index = GraphIndex::build(&[]);
        assert!(index.is_empty());
        assert!(!index.contains(""));
    }

    #[test]
    fn test_unresolved_blockers() {
        let items = vec![
            WorkItem::new("a"),
            WorkItem::new("b").blocked_by(["x", "a", "y"]),
        ];
        let index = GraphIndex::build(&items);

        assert_eq!(unresolved_blockers(&items[1], &index), vec!["x", "y"]);
        assert!(unresolved_blockers(&items[0], &index).is_empty());
    }
}
