//! Organizational hierarchy construction and path resolution.
//!
//! # Pipeline
//!
//! ```text
//! flat OrgUnit rows (record store)
//!        ↓  build::HierarchyIndex::build()
//! HierarchyIndex (id-indexed arena, cycle-checked, orphans reported)
//!        ↓  build::OrgForest::from_index()
//! OrgForest (owned trees, children name-sorted, deleted nodes flagged)
//!
//! HierarchyIndex + target id
//!        ↓  path::resolve_path()
//! Vec<PathNode> (root → target, O(depth))
//! ```
//!
//! The index is the single source of truth: the forest and the path resolver
//! both read it, and neither re-walks the whole record set.

pub mod build;
pub mod path;

pub use build::{HierarchyIndex, OrgForest, OrgTreeNode};
pub use path::{PathNode, resolve_path};
