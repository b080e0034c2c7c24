#![forbid(unsafe_code)]
//! verband-graph library.
//!
//! Builds the two relationship structures of the verband engine from flat
//! records and reduces them to statistics:
//!
//! - [`hierarchy`]: rooted forest of organizational units from parent-pointer
//!   rows, with cycle detection, orphan reporting, and root→node path
//!   resolution;
//! - [`family`]: depth-bounded parent/child/sibling graph for one member
//!   from relationship edges, cycle-safe against looping real-world data;
//! - [`stats`]: pure reductions over either structure.
//!
//! Everything is built fresh per request from a snapshot of records and
//! owned by the caller afterwards. No caches, no shared state.
//!
//! # Conventions
//!
//! - **Errors**: typed `verband_core::Error` results.
//! - **Logging**: `tracing` macros; builders are `#[instrument]`ed.

pub mod family;
pub mod hierarchy;
pub mod stats;

pub use family::{FamilyGraph, FamilyGraphBuilder, FamilyTreeNode, Relation};
pub use hierarchy::{HierarchyIndex, OrgForest, OrgTreeNode, PathNode, resolve_path};
pub use stats::{FamilyStatistics, HierarchyStatistics};
