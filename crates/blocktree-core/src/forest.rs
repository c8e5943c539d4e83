//! Single-parent layout forest derived from blocker lists.
//!
//! Each item hangs under the first blocker in its `blocked_by` list that is
//! part of the snapshot. The remaining blocker edges stay on the item for
//! display but do not shape the tree. This is a rendering aid only; it says
//! nothing about which items are actually ready.

use crate::index::GraphIndex;
use crate::item::WorkItem;
use tracing::debug;

/// Arena form of the layout forest. Nodes are snapshot positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    /// Forest parent of each node, if any.
    pub parent: Vec<Option<usize>>,
    /// Children of each node, in snapshot order.
    pub children: Vec<Vec<usize>>,
    /// Traversal entry points, in snapshot order.
    pub roots: Vec<usize>,
}

impl Forest {
    /// Derive the forest for a snapshot.
    ///
    /// When no item is parentless (every item hangs off another through
    /// cycles), every item becomes a root so traversal still has an entry
    /// point.
    #[must_use]
    pub fn build(items: &[WorkItem], index: &GraphIndex<'_>) -> Self {
        let parent: Vec<Option<usize>> = items
            .iter()
            .map(|item| {
                item.blocked_by
                    .iter()
                    .find_map(|blocker| index.position(blocker))
            })
            .collect();

        let mut children = vec![Vec::new(); items.len()];
        for (node, p) in parent.iter().enumerate() {
            if let Some(p) = *p {
                children[p].push(node);
            }
        }

        let mut roots: Vec<usize> = parent
            .iter()
            .enumerate()
            .filter_map(|(node, p)| p.is_none().then_some(node))
            .collect();
        if roots.is_empty() {
            debug!(items = items.len(), "No parentless item, using every item as a root");
            roots = (0..items.len()).collect();
        }

        Self {
            parent,
            children,
            roots,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn forest(items: &[WorkItem]) -> Forest {
        let index = GraphIndex::build(items);
        Forest::build(items, &index)
    }

    #[test]
    fn test_chain_with_unknown_blocker() {
        let items = vec![
            WorkItem::new("A"),
            WorkItem::new("B").blocked_by(["A"]),
            WorkItem::new("C").blocked_by(["B"]),
            WorkItem::new("D").blocked_by(["X"]),
        ];
        let f = forest(&items);

        assert_eq!(f.roots, vec![0, 3]);
        assert_eq!(f.children[0], vec![1]);
        assert_eq!(f.children[1], vec![2]);
        assert!(f.children[2].is_empty());
        assert_eq!(f.parent, vec![None, Some(0), Some(1), None]);
    }

    #[test]
    fn test_first_known_blocker_is_parent() {
        let items = vec![
            WorkItem::new("a"),
            WorkItem::new("b"),
            WorkItem::new("c").blocked_by(["ghost", "b", "a"]),
        ];
        let f = forest(&items);

        assert_eq!(f.parent[2], Some(1));
        assert!(f.children[0].is_empty());
        assert_eq!(f.roots, vec![0, 1]);
    }

    #[test]
    fn test_siblings_keep_snapshot_order() {
        let items = vec![
            WorkItem::new("z").blocked_by(["p"]),
            WorkItem::new("p"),
            WorkItem::new("y").blocked_by(["p"]),
            WorkItem::new("x").blocked_by(["p"]),
        ];
        let f = forest(&items);

        assert_eq!(f.children[1], vec![0, 2, 3]);
        assert_eq!(f.roots, vec![1]);
    }

    #[test]
    fn test_all_entangled_falls_back_to_every_root() {
        let items = vec![
            WorkItem::new("A").blocked_by(["B"]),
            WorkItem::new("B").blocked_by(["A"]),
        ];
        let f = forest(&items);

        assert_eq!(f.roots, vec![0, 1]);
        assert_eq!(f.children[0], vec![1]);
        assert_eq!(f.children[1], vec![0]);
    }

    #[test]
    fn test_empty_snapshot() {
        let f = forest(&[]);
        assert!(f.is_empty());
        assert!(f.roots.is_empty());
    }
}
