//! blocktree-core: Blocking depth and dependency forest ordering for work items.
//!
//! This crate provides:
//! - `WorkItem`: The work item model with its `blocked_by` edges
//! - `GraphIndex`: First-seen identifier index over a snapshot
//! - Depth resolution: longest blocker chain per item, cycle-safe
//! - `Forest` and tree ordering: single-parent layout forest walked
//!   depth-first with box-drawing prefixes
//! - Snapshot loading from JSON, NDJSON or YAML
//!
//! The graph passes are total: cycles, self-loops, dangling blockers and
//! duplicate identifiers degrade to defined values instead of errors.

pub mod depth;
pub mod error;
pub mod forest;
pub mod index;
pub mod item;
pub mod snapshot;
pub mod tree;

pub use depth::{apply_blocking_depth, resolve_depths};
pub use error::{CoreError, Result};
pub use forest::Forest;
pub use index::{unresolved_blockers, GraphIndex};
pub use item::WorkItem;
pub use snapshot::SnapshotFormat;
pub use tree::{build_tree_prefix, order_by_blocking_tree, tree_order, TreeEntry};

/// Compute blocking depths and reorder into forest order in one call.
///
/// Both passes read the same snapshot; their results are independent.
#[must_use]
pub fn annotate(mut items: Vec<WorkItem>) -> Vec<WorkItem> {
    apply_blocking_depth(&mut items);
    order_by_blocking_tree(items)
}
