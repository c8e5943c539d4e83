//! Blocking depth resolution.
//!
//! The depth of an item is the length of the longest chain of blockers that
//! ends at it. Items with no blockers sit at depth 0, a blocker missing from
//! the snapshot counts as a chain of length 1, and a blocker that is part of
//! the chain currently being resolved (a cycle back-edge) contributes 0
//! without being memoized. An item that lists any blocker is at depth 1 or
//! more.
//!
//! Resolution walks an explicit frame stack instead of recursing, so very
//! long chains cannot exhaust the call stack. The visiting order matches a
//! recursive walk over `blocked_by` in list order, which matters because
//! cycle back-edges make the result order dependent.

use crate::index::GraphIndex;
use crate::item::WorkItem;
use tracing::{debug, trace};

/// Compute the blocking depth of every item, in snapshot order.
///
/// Duplicate identifiers all report the depth of the first occurrence.
#[must_use]
pub fn resolve_depths(items: &[WorkItem], index: &GraphIndex<'_>) -> Vec<usize> {
    let mut resolver = DepthResolver::new(items, index);
    let depths: Vec<usize> = items
        .iter()
        .enumerate()
        .map(|(pos, item)| resolver.depth_of(index.position(&item.id).unwrap_or(pos)))
        .collect();

    debug!(
        items = items.len(),
        max_depth = depths.iter().copied().max().unwrap_or(0),
        cycle_breaks = resolver.cycle_breaks,
        "Resolved blocking depths"
    );

    depths
}

/// Overwrite `blocking_depth` on every item of the snapshot.
pub fn apply_blocking_depth(items: &mut [WorkItem]) {
    let depths = {
        let index = GraphIndex::build(items);
        resolve_depths(items, &index)
    };

    for (item, depth) in items.iter_mut().zip(depths) {
        item.blocking_depth = depth;
    }
}

/// One item whose blockers are being resolved.
#[derive(Debug)]
struct Frame {
    node: usize,
    next_blocker: usize,
    max: usize,
}

enum Step {
    Resolved(usize),
    Enter,
}

/// Per-call working state. Never outlives one `resolve_depths` call.
struct DepthResolver<'s, 'a> {
    items: &'s [WorkItem],
    index: &'s GraphIndex<'a>,
    memo: Vec<Option<usize>>,
    visiting: Vec<bool>,
    cycle_breaks: usize,
}

impl<'s, 'a> DepthResolver<'s, 'a> {
    fn new(items: &'s [WorkItem], index: &'s GraphIndex<'a>) -> Self {
        Self {
            items,
            index,
            memo: vec![None; items.len()],
            visiting: vec![false; items.len()],
            cycle_breaks: 0,
        }
    }

    /// Decide whether `node` already has an answer or must be entered.
    fn lookup(&mut self, node: usize) -> Step {
        if let Some(depth) = self.memo[node] {
            return Step::Resolved(depth);
        }

        if self.items[node].blocked_by.is_empty() {
            self.memo[node] = Some(0);
            return Step::Resolved(0);
        }

        // Back-edge into the active chain: contributes nothing, stays unmemoized.
        if self.visiting[node] {
            self.cycle_breaks += 1;
            trace!(id = %self.items[node].id, "Cycle back-edge, contributing 0");
            return Step::Resolved(0);
        }

        Step::Enter
    }

    fn enter(&mut self, node: usize) -> Frame {
        self.visiting[node] = true;
        Frame {
            node,
            next_blocker: 0,
            max: 0,
        }
    }

    fn finish(&mut self, frame: &Frame) -> usize {
        self.visiting[frame.node] = false;
        // A listed blocker always means depth >= 1.
        let depth = frame.max.max(1);
        self.memo[frame.node] = Some(depth);
        depth
    }

    fn depth_of(&mut self, start: usize) -> usize {
        let items = self.items;
        let index = self.index;

        let mut stack = match self.lookup(start) {
            Step::Resolved(depth) => return depth,
            Step::Enter => vec![self.enter(start)],
        };

        while let Some(frame) = stack.last_mut() {
            if let Some(blocker) = items[frame.node].blocked_by.get(frame.next_blocker) {
                frame.next_blocker += 1;
                match index.position(blocker) {
                    // Unknown blocker: satisfied elsewhere, counts as one link.
                    None => frame.max = frame.max.max(1),
                    Some(pos) => match self.lookup(pos) {
                        Step::Resolved(depth) => frame.max = frame.max.max(depth + 1),
                        Step::Enter => {
                            let child = self.enter(pos);
                            stack.push(child);
                        }
                    },
                }
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let depth = self.finish(&done);
            match stack.last_mut() {
                Some(parent) => parent.max = parent.max.max(depth + 1),
                None => return depth,
            }
        }

        self.memo[start].unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn depths(items: &[WorkItem]) -> Vec<usize> {
        let index = GraphIndex::build(items);
        resolve_depths(items, &index)
    }

    #[test]
    fn test_unblocked_items_are_zero() {
        let items = vec![WorkItem::new("a"), WorkItem::new("b")];
        assert_eq!(depths(&items), vec![0, 0]);
    }

    #[test]
    fn test_chain_and_unknown_blocker() {
        let items = vec![
            WorkItem::new("A"),
            WorkItem::new("B").blocked_by(["A"]),
            WorkItem::new("C").blocked_by(["B"]),
            WorkItem::new("D").blocked_by(["X"]),
        ];
        assert_eq!(depths(&items), vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_longest_chain_wins() {
        let items = vec![
            WorkItem::new("root"),
            WorkItem::new("mid").blocked_by(["root"]),
            WorkItem::new("top").blocked_by(["root", "mid", "ext"]),
        ];
        assert_eq!(depths(&items), vec![0, 1, 2]);
    }

    #[test]
    fn test_self_loop_is_one() {
        let items = vec![WorkItem::new("a").blocked_by(["a"])];
        assert_eq!(depths(&items), vec![1]);
    }

    #[test]
    fn test_mutual_block_breaks_on_back_edge() {
        let items = vec![
            WorkItem::new("A").blocked_by(["B"]),
            WorkItem::new("B").blocked_by(["A"]),
        ];
        // Resolving A enters B, whose back-edge to A counts as 0, so B = 1
        // and A = 1 + B.
        assert_eq!(depths(&items), vec![2, 1]);
    }

    #[test]
    fn test_cycle_feeding_a_chain() {
        let items = vec![
            WorkItem::new("a").blocked_by(["b"]),
            WorkItem::new("b").blocked_by(["c"]),
            WorkItem::new("c").blocked_by(["a"]),
            WorkItem::new("d").blocked_by(["c"]),
        ];
        let got = depths(&items);
        assert_eq!(got, vec![3, 2, 1, 2]);
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let n = 200_000;
        let mut items: Vec<WorkItem> = (0..n)
            .map(|i| {
                let item = WorkItem::new(format!("t{i}"));
                if i == 0 {
                    item
                } else {
                    item.blocked_by([format!("t{}", i - 1)])
                }
            })
            .collect();
        // Deepest item first so the first resolution walks the whole chain.
        items.reverse();

        let got = depths(&items);
        assert_eq!(got[0], n - 1);
        assert_eq!(got[n - 1], 0);
    }

    #[test]
    fn test_duplicate_ids_share_first_depth() {
        let items = vec![
            WorkItem::new("a"),
            WorkItem::new("b").blocked_by(["a"]),
            WorkItem::new("a").blocked_by(["b"]),
        ];
        assert_eq!(depths(&items), vec![0, 1, 0]);
    }

    #[test]
    fn test_apply_overwrites_stale_values() {
        let mut items = vec![WorkItem::new("a"), WorkItem::new("b").blocked_by(["a"])];
        items[0].blocking_depth = 42;

        apply_blocking_depth(&mut items);

        assert_eq!(items[0].blocking_depth, 0);
        assert_eq!(items[1].blocking_depth, 1);
    }
}
