//! Relationship statistics over the two built structures.
//!
//! # Statistics Provided
//!
//! - [`FamilyStatistics`]: per-member reduction over a family edge snapshot —
//!   total/active/inactive relationships, as-child/as-parent splits,
//!   distinct parents/children/siblings, and counts keyed by relationship
//!   type id and status id (maps, unordered).
//! - [`HierarchyStatistics`]: reduction over a built [`HierarchyIndex`] —
//!   node/root/orphan counts, active/deleted splits, counts per org type,
//!   and the number of detected type-ordering violations.
//!
//! Both are pure and deterministic given the same input; neither holds any
//! state or touches the structures it reduces.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use verband_core::{FamilyEdge, MemberId, OrgType};

use crate::hierarchy::HierarchyIndex;

// ---------------------------------------------------------------------------
// FamilyStatistics
// ---------------------------------------------------------------------------

/// Summary counts for one member's family relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyStatistics {
    /// Edges touching the member in either direction.
    pub total_relationships: usize,
    /// Of those, effective at the evaluation instant.
    pub active_relationships: usize,
    pub inactive_relationships: usize,
    /// Edges where the member is the child.
    pub as_child_relationships: usize,
    /// Edges where the member is the parent.
    pub as_parent_relationships: usize,
    pub total_parents: usize,
    pub total_children: usize,
    pub total_siblings: usize,
    /// Count per relationship-type id. Keyed by id, unordered.
    pub by_type: HashMap<i64, usize>,
    /// Count per relationship-status id. Keyed by id, unordered.
    pub by_status: HashMap<i64, usize>,
}

impl FamilyStatistics {
    /// Reduce `edges` to the statistics for `member`, evaluating
    /// effectiveness at `now`.
    #[must_use]
    pub fn from_edges(member: MemberId, edges: &[FamilyEdge], now: DateTime<Utc>) -> Self {
        let own: Vec<&FamilyEdge> = edges
            .iter()
            .filter(|e| e.child == member || e.parent == member)
            .collect();

        let active = own.iter().filter(|e| e.is_effective(now)).count();

        let mut by_type: HashMap<i64, usize> = HashMap::new();
        let mut by_status: HashMap<i64, usize> = HashMap::new();
        for edge in &own {
            *by_type.entry(edge.relationship_type).or_default() += 1;
            *by_status.entry(edge.status).or_default() += 1;
        }

        let parents: HashSet<MemberId> = own
            .iter()
            .filter(|e| e.child == member)
            .map(|e| e.parent)
            .collect();
        let children: HashSet<MemberId> = own
            .iter()
            .filter(|e| e.parent == member)
            .map(|e| e.child)
            .collect();

        let siblings: HashSet<MemberId> = edges
            .iter()
            .filter(|e| e.child != member && parents.contains(&e.parent))
            .map(|e| e.child)
            .collect();

        Self {
            total_relationships: own.len(),
            active_relationships: active,
            inactive_relationships: own.len() - active,
            as_child_relationships: own.iter().filter(|e| e.child == member).count(),
            as_parent_relationships: own.iter().filter(|e| e.parent == member).count(),
            total_parents: parents.len(),
            total_children: children.len(),
            total_siblings: siblings.len(),
            by_type,
            by_status,
        }
    }
}

// ---------------------------------------------------------------------------
// HierarchyStatistics
// ---------------------------------------------------------------------------

/// Summary counts for a built organizational hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyStatistics {
    pub node_count: usize,
    pub root_count: usize,
    pub orphan_count: usize,
    pub active_count: usize,
    pub deleted_count: usize,
    /// Node count per org type. Keyed by type, unordered.
    pub by_org_type: HashMap<OrgType, usize>,
    /// Detected (not enforced) org-type ordering violations.
    pub type_violation_count: usize,
}

impl HierarchyStatistics {
    /// Reduce a built index to its summary counts.
    #[must_use]
    pub fn from_index(index: &HierarchyIndex) -> Self {
        let mut by_org_type: HashMap<OrgType, usize> = HashMap::new();
        let mut active_count = 0;
        let mut deleted_count = 0;
        for unit in index.units() {
            *by_org_type.entry(unit.org_type).or_default() += 1;
            if unit.active {
                active_count += 1;
            }
            if unit.deleted_flag {
                deleted_count += 1;
            }
        }

        Self {
            node_count: index.len(),
            root_count: index.roots().len(),
            orphan_count: index.orphans().len(),
            active_count,
            deleted_count,
            by_org_type,
            type_violation_count: index.type_violations().len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
