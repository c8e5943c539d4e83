//! Depth-first ordering of the layout forest with tree-drawing prefixes.

use crate::forest::Forest;
use crate::index::GraphIndex;
use crate::item::WorkItem;
use tracing::debug;

/// Column under an ancestor that has more siblings below it.
pub const CONTINUE: &str = "│  ";
/// Column under an ancestor that was the last of its siblings.
pub const BLANK: &str = "   ";
/// Branch for a node followed by a sibling.
pub const TEE: &str = "├─ ";
/// Branch for the last node among its siblings.
pub const ELBOW: &str = "└─ ";

/// One visited node in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Snapshot position of the item.
    pub node: usize,
    /// Tree depth; 0 for roots and for unreachable leftovers.
    pub depth: usize,
    /// Rendered prefix, empty at depth 0.
    pub prefix: String,
}

/// Build the prefix for a non-root node.
///
/// `ancestors` holds, oldest first, whether each ancestor has a following
/// sibling; `has_next` is the same flag for the node itself.
#[must_use]
pub fn build_tree_prefix(ancestors: &[bool], has_next: bool) -> String {
    let mut prefix = String::with_capacity((ancestors.len() + 1) * CONTINUE.len());
    for &ancestor_has_next in ancestors {
        prefix.push_str(if ancestor_has_next { CONTINUE } else { BLANK });
    }
    prefix.push_str(if has_next { TEE } else { ELBOW });
    prefix
}

struct Pending {
    node: usize,
    ancestors: Vec<bool>,
    has_next: bool,
    depth: usize,
}

/// Walk the forest depth-first in pre-order, roots in root order and
/// children in recorded order.
///
/// Every node appears exactly once. Nodes no root reaches are appended at
/// the end, unprefixed, in snapshot order.
#[must_use]
pub fn tree_order(forest: &Forest) -> Vec<TreeEntry> {
    let mut visited = vec![false; forest.len()];
    let mut order = Vec::with_capacity(forest.len());
    let mut stack: Vec<Pending> = Vec::new();

    for (i, &root) in forest.roots.iter().enumerate() {
        stack.push(Pending {
            node: root,
            ancestors: Vec::new(),
            has_next: i + 1 < forest.roots.len(),
            depth: 0,
        });

        while let Some(Pending {
            node,
            mut ancestors,
            has_next,
            depth,
        }) = stack.pop()
        {
            if visited[node] {
                continue;
            }
            visited[node] = true;

            let prefix = if depth > 0 {
                build_tree_prefix(&ancestors, has_next)
            } else {
                String::new()
            };
            order.push(TreeEntry {
                node,
                depth,
                prefix,
            });

            let children = &forest.children[node];
            ancestors.push(has_next);
            // Reversed so the first child is popped first.
            for (ci, &child) in children.iter().enumerate().rev() {
                stack.push(Pending {
                    node: child,
                    ancestors: ancestors.clone(),
                    has_next: ci + 1 < children.len(),
                    depth: depth + 1,
                });
            }
        }
    }

    let reached = order.len();
    for (node, seen) in visited.iter().enumerate() {
        if !seen {
            order.push(TreeEntry {
                node,
                depth: 0,
                prefix: String::new(),
            });
        }
    }

    debug!(
        roots = forest.roots.len(),
        reached,
        leftovers = order.len() - reached,
        "Ordered blocking tree"
    );

    order
}

/// Reorder a snapshot into depth-first forest order, overwriting
/// `tree_prefix` on every item. The item count never changes.
#[must_use]
pub fn order_by_blocking_tree(items: Vec<WorkItem>) -> Vec<WorkItem> {
    if items.is_empty() {
        return items;
    }

    let entries = {
        let index = GraphIndex::build(&items);
        let forest = Forest::build(&items, &index);
        tree_order(&forest)
    };

    let mut slots: Vec<Option<WorkItem>> = items.into_iter().map(Some).collect();
    entries
        .into_iter()
        .filter_map(|entry| {
            let mut item = slots[entry.node].take()?;
            item.tree_prefix = entry.prefix;
            Some(item)
        })
        .collect()
}
