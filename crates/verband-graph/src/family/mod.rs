//! Member family graph construction.
//!
//! # Pipeline
//!
//! ```text
//! flat FamilyEdge rows (record store)
//!        ↓  build::FamilyGraphBuilder::new(edges, max_depth)
//! FamilyGraphBuilder (validated edges, direction indexes)
//!        ↓  .build(member)
//! FamilyGraph (Parents / Children / Siblings groups + counters)
//! ```
//!
//! Family edge data is not guaranteed acyclic — remarriage and re-entry
//! edges can loop — so traversal always carries a caller-supplied depth
//! bound and per-direction visited sets. Siblings are derived at depth 1
//! only, from shared parents.

pub mod build;

pub use build::{FamilyGraph, FamilyGraphBuilder, FamilyTreeNode, Relation};
