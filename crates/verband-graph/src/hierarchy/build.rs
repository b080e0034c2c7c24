//! Hierarchy index and owned-tree construction from flat unit rows.
//!
//! # Overview
//!
//! [`HierarchyIndex::build`] indexes every [`OrgUnit`] row by id, verifies
//! that all parent chains terminate (no cycles), and records structural
//! findings: orphans (parent id absent from the input) and org-type ordering
//! violations (child not strictly below its parent). Orphans become roots of
//! their own subtrees and are reported, never silently attached or dropped.
//!
//! [`OrgForest::from_index`] materializes the owned tree value objects the
//! presentation layer serializes. Deleted units are included with their flag
//! set; pruning is the caller's policy, not the engine's.
//!
//! ## Cycle detection
//!
//! The parent pointers form a digraph with out-degree ≤ 1. Any strongly
//! connected component with more than one node, or a self-loop, means some
//! chain never reaches a root, which makes every tree containing it
//! meaningless — the whole build fails with `CycleDetected` naming the
//! smallest id in the offending cycle.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use verband_core::{Error, OrgId, OrgType, OrgUnit, Result};

// ---------------------------------------------------------------------------
// HierarchyIndex
// ---------------------------------------------------------------------------

/// Id-indexed arena over one snapshot of organizational-unit rows.
///
/// Built once per request, cycle-checked on construction, then shared by the
/// forest materializer, the path resolver, and the statistics aggregator.
#[derive(Debug)]
pub struct HierarchyIndex {
    units: HashMap<OrgId, OrgUnit>,
    /// Child ids per parent, sorted by (name, id) for deterministic output.
    children: HashMap<OrgId, Vec<OrgId>>,
    /// Ids with no parent pointer at all, sorted.
    roots: Vec<OrgId>,
    /// Ids whose parent pointer does not resolve within this snapshot,
    /// sorted. Also present in `roots`' role structurally: they head their
    /// own subtrees.
    orphans: Vec<OrgId>,
    /// `(child, parent)` pairs whose org types are not strictly ordered.
    type_violations: Vec<(OrgId, OrgId)>,
}

impl HierarchyIndex {
    /// Index `records` and verify parent-chain integrity.
    ///
    /// Duplicate ids keep the first record and log a warning. Orphans and
    /// type-order violations are recorded, not fatal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if any parent chain revisits an id
    /// (including a unit naming itself as parent). Nothing is returned in
    /// that case — a partially cyclic snapshot has no usable trees.
    #[instrument(skip(records), fields(record_count = records.len()))]
    pub fn build(records: &[OrgUnit]) -> Result<Self> {
        let mut units: HashMap<OrgId, OrgUnit> = HashMap::with_capacity(records.len());
        for record in records {
            if units.contains_key(&record.id) {
                warn!(id = record.id, "duplicate unit id in snapshot, keeping first");
                continue;
            }
            units.insert(record.id, record.clone());
        }

        detect_cycles(&units)?;

        let mut children: HashMap<OrgId, Vec<OrgId>> = HashMap::new();
        let mut roots: Vec<OrgId> = Vec::new();
        let mut orphans: Vec<OrgId> = Vec::new();
        let mut type_violations: Vec<(OrgId, OrgId)> = Vec::new();

        for unit in units.values() {
            match unit.parent {
                None => roots.push(unit.id),
                Some(parent_id) => {
                    if let Some(parent) = units.get(&parent_id) {
                        children.entry(parent_id).or_default().push(unit.id);
                        if unit.org_type.rank() <= parent.org_type.rank() {
                            type_violations.push((unit.id, parent_id));
                        }
                    } else {
                        orphans.push(unit.id);
                    }
                }
            }
        }

        for siblings in children.values_mut() {
            siblings.sort_unstable_by(|a, b| {
                let name_a = units.get(a).map_or("", |u| u.name.as_str());
                let name_b = units.get(b).map_or("", |u| u.name.as_str());
                name_a.cmp(name_b).then(a.cmp(b))
            });
        }
        roots.sort_unstable();
        orphans.sort_unstable();
        type_violations.sort_unstable();

        if !orphans.is_empty() {
            debug!(orphan_count = orphans.len(), "snapshot contains orphan units");
        }
        if !type_violations.is_empty() {
            debug!(
                violation_count = type_violations.len(),
                "snapshot contains org-type ordering violations"
            );
        }

        Ok(Self {
            units,
            children,
            roots,
            orphans,
            type_violations,
        })
    }

    /// Look up a unit record by id.
    #[must_use]
    pub fn unit(&self, id: OrgId) -> Option<&OrgUnit> {
        self.units.get(&id)
    }

    /// Number of indexed units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the snapshot was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Ids with no parent pointer, sorted.
    #[must_use]
    pub fn roots(&self) -> &[OrgId] {
        &self.roots
    }

    /// Ids whose parent did not resolve within the snapshot, sorted.
    ///
    /// These head their own subtrees in the forest; they are reported here
    /// so callers can distinguish them from true roots.
    #[must_use]
    pub fn orphans(&self) -> &[OrgId] {
        &self.orphans
    }

    /// `(child, parent)` pairs violating the org-type ordering, sorted.
    #[must_use]
    pub fn type_violations(&self) -> &[(OrgId, OrgId)] {
        &self.type_violations
    }

    /// Child ids of `id`, sorted by (name, id). Empty for leaves and
    /// unknown ids.
    #[must_use]
    pub fn children_of(&self, id: OrgId) -> &[OrgId] {
        self.children.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Iterate all indexed unit records in unspecified order.
    pub fn units(&self) -> impl Iterator<Item = &OrgUnit> {
        self.units.values()
    }

    /// Ids that head a tree in the forest: true roots plus orphans, sorted.
    #[must_use]
    pub fn tree_heads(&self) -> Vec<OrgId> {
        let mut heads: Vec<OrgId> = self.roots.iter().chain(&self.orphans).copied().collect();
        heads.sort_unstable();
        heads
    }
}

/// Fail with `CycleDetected` if any parent chain loops.
///
/// Runs Tarjan's SCC over the child→parent digraph; a component of size > 1
/// or a self-loop is a cycle. Reports the smallest id in the first cycle,
/// choosing the cycle with the overall smallest member so the error is
/// deterministic regardless of input order.
fn detect_cycles(units: &HashMap<OrgId, OrgUnit>) -> Result<()> {
    let mut graph = DiGraph::<OrgId, ()>::new();
    let mut node_map: HashMap<OrgId, NodeIndex> = HashMap::with_capacity(units.len());

    for &id in units.keys() {
        let idx = graph.add_node(id);
        node_map.insert(id, idx);
    }
    for unit in units.values() {
        if let Some(parent_id) = unit.parent {
            if let Some(&parent_idx) = node_map.get(&parent_id) {
                graph.add_edge(node_map[&unit.id], parent_idx, ());
            }
        }
    }

    let mut offender: Option<OrgId> = None;
    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&node| graph.find_edge(node, node).is_some());
        if !is_cycle {
            continue;
        }
        let smallest = component
            .iter()
            .filter_map(|&idx| graph.node_weight(idx))
            .copied()
            .min()
            .unwrap_or_default();
        offender = Some(offender.map_or(smallest, |prev| prev.min(smallest)));
    }

    match offender {
        Some(id) => Err(Error::CycleDetected { id }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// OrgForest
// ---------------------------------------------------------------------------

/// One owned, serializable node of a materialized organizational tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgTreeNode {
    pub id: OrgId,
    pub name: String,
    pub org_type: OrgType,
    pub deleted_flag: bool,
    /// Always present, even when empty.
    pub children: Vec<OrgTreeNode>,
}

/// The materialized forest: one owned tree per head (root or orphan).
///
/// Built fresh per query from a [`HierarchyIndex`], never mutated after
/// construction, discarded once the response is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgForest {
    /// Trees keyed by head id, in ascending id order.
    pub roots: BTreeMap<OrgId, OrgTreeNode>,
    /// Orphan head ids, so callers can tell them apart from true roots.
    pub orphans: Vec<OrgId>,
}

impl OrgForest {
    /// Materialize every tree in the index.
    #[must_use]
    pub fn from_index(index: &HierarchyIndex) -> Self {
        let roots = index
            .tree_heads()
            .into_iter()
            .filter_map(|id| materialize(index, id).map(|node| (id, node)))
            .collect();
        Self {
            roots,
            orphans: index.orphans().to_vec(),
        }
    }

    /// Materialize the subtree headed at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when `root` is not in the index.
    pub fn subtree(index: &HierarchyIndex, root: OrgId) -> Result<OrgTreeNode> {
        materialize(index, root).ok_or(Error::NotFound { id: root })
    }
}

/// Build the owned node for `id` and all its descendants.
///
/// Iterative post-order over an explicit work stack, so a legitimately deep
/// chain cannot overflow the call stack. Children land on the value stack
/// in sibling order before their parent is assembled.
fn materialize(index: &HierarchyIndex, id: OrgId) -> Option<OrgTreeNode> {
    enum Walk {
        Enter(OrgId),
        Assemble(OrgId),
    }

    index.unit(id)?;

    let mut work: Vec<Walk> = vec![Walk::Enter(id)];
    let mut built: Vec<OrgTreeNode> = Vec::new();

    while let Some(step) = work.pop() {
        match step {
            Walk::Enter(current) => {
                work.push(Walk::Assemble(current));
                // Reversed so the first child is entered, and assembled,
                // first.
                for &child in index.children_of(current).iter().rev() {
                    work.push(Walk::Enter(child));
                }
            }
            Walk::Assemble(current) => {
                // Every id on the work stack came from the index, via the
                // pre-checked head or the children map.
                let Some(unit) = index.unit(current) else {
                    continue;
                };
                let child_count = index.children_of(current).len();
                let children = built.split_off(built.len() - child_count);
                built.push(OrgTreeNode {
                    id: unit.id,
                    name: unit.name.clone(),
                    org_type: unit.org_type,
                    deleted_flag: unit.deleted_flag,
                    children,
                });
            }
        }
    }

    built.pop()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: OrgId, name: &str, org_type: OrgType, parent: Option<OrgId>) -> OrgUnit {
        OrgUnit {
            id,
            name: name.to_string(),
            org_type,
            parent,
            federation_code: None,
            active: true,
            deleted_flag: false,
        }
    }

    fn sample_records() -> Vec<OrgUnit> {
        vec![
            unit(1, "Bund", OrgType::Federation, None),
            unit(2, "Nord", OrgType::RegionalBody, Some(1)),
            unit(3, "Sued", OrgType::RegionalBody, Some(1)),
            unit(4, "Kiel", OrgType::LocalAssociation, Some(2)),
        ]
    }

    #[test]
    fn empty_snapshot_builds_empty_index() {
        let index = HierarchyIndex::build(&[]).expect("build");
        assert!(index.is_empty());
        assert!(index.roots().is_empty());
        assert!(index.orphans().is_empty());
    }

    #[test]
    fn single_tree_with_two_children_and_nesting() {
        let index = HierarchyIndex::build(&sample_records()).expect("build");
        let forest = OrgForest::from_index(&index);

        assert_eq!(forest.roots.len(), 1);
        let root = &forest.roots[&1];
        assert_eq!(root.id, 1);
        let child_ids: Vec<OrgId> = root.children.iter().map(|c| c.id).collect();
        assert_eq!(child_ids, vec![2, 3], "two children under the root");
        assert_eq!(root.children[0].children[0].id, 4, "node 4 nested under 2");
        assert!(forest.orphans.is_empty());
    }

    #[test]
    fn children_sorted_by_name_then_id() {
        let records = vec![
            unit(1, "Bund", OrgType::Federation, None),
            unit(5, "Zeta", OrgType::RegionalBody, Some(1)),
            unit(3, "Alpha", OrgType::RegionalBody, Some(1)),
            unit(4, "Alpha", OrgType::RegionalBody, Some(1)),
        ];
        let index = HierarchyIndex::build(&records).expect("build");
        assert_eq!(index.children_of(1), &[3, 4, 5]);
    }

    #[test]
    fn build_is_idempotent_irrespective_of_record_order() {
        let mut shuffled = sample_records();
        shuffled.reverse();

        let a = OrgForest::from_index(&HierarchyIndex::build(&sample_records()).expect("build"));
        let b = OrgForest::from_index(&HierarchyIndex::build(&shuffled).expect("build"));
        assert_eq!(a, b, "structurally equal trees regardless of input order");
    }

    #[test]
    fn missing_parent_becomes_reported_orphan_root() {
        let records = vec![
            unit(1, "Bund", OrgType::Federation, None),
            unit(9, "Lost", OrgType::LocalAssociation, Some(777)),
        ];
        let index = HierarchyIndex::build(&records).expect("build");
        assert_eq!(index.orphans(), &[9]);

        let forest = OrgForest::from_index(&index);
        assert!(forest.roots.contains_key(&9), "orphan heads its own tree");
        assert_eq!(forest.orphans, vec![9]);
    }

    #[test]
    fn self_parent_fails_with_cycle_error() {
        let records = vec![unit(3, "Loop", OrgType::Region, Some(3))];
        let err = HierarchyIndex::build(&records).expect_err("must fail");
        assert_eq!(err, Error::CycleDetected { id: 3 });
    }

    #[test]
    fn two_node_cycle_fails_and_names_smallest_id() {
        let records = vec![
            unit(2, "A", OrgType::Region, Some(5)),
            unit(5, "B", OrgType::Region, Some(2)),
            unit(1, "Bund", OrgType::Federation, None),
        ];
        let err = HierarchyIndex::build(&records).expect_err("must fail");
        assert_eq!(err, Error::CycleDetected { id: 2 });
    }

    #[test]
    fn deleted_units_included_and_flagged() {
        let mut records = sample_records();
        records[3].deleted_flag = true;

        let index = HierarchyIndex::build(&records).expect("build");
        let tree = OrgForest::subtree(&index, 2).expect("subtree");
        assert_eq!(tree.children.len(), 1, "deleted child still present");
        assert!(tree.children[0].deleted_flag);
    }

    #[test]
    fn deeply_nested_chain_materializes_without_stack_overflow() {
        let depth: OrgId = 50_000;
        let records: Vec<OrgUnit> = (0..depth)
            .map(|i| {
                let parent = (i > 0).then_some(i - 1);
                unit(i, "Glied", OrgType::Region, parent)
            })
            .collect();
        let index = HierarchyIndex::build(&records).expect("build");

        let tree = OrgForest::subtree(&index, 0).expect("subtree");
        let mut node = &tree;
        let mut levels: OrgId = 1;
        while let Some(child) = node.children.first() {
            node = child;
            levels += 1;
        }
        assert_eq!(levels, depth, "every link of the chain materialized");
    }

    #[test]
    fn subtree_of_unknown_id_is_not_found() {
        let index = HierarchyIndex::build(&sample_records()).expect("build");
        let err = OrgForest::subtree(&index, 99).expect_err("must fail");
        assert_eq!(err, Error::NotFound { id: 99 });
    }

    #[test]
    fn type_order_violations_detected_not_enforced() {
        // A federation filed under a local association: wrong order, but the
        // build still succeeds and reports the pair.
        let records = vec![
            unit(1, "Klein", OrgType::LocalAssociation, None),
            unit(2, "Gross", OrgType::Federation, Some(1)),
        ];
        let index = HierarchyIndex::build(&records).expect("build");
        assert_eq!(index.type_violations(), &[(2, 1)]);
        assert!(OrgForest::subtree(&index, 1).is_ok());
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let records = vec![
            unit(1, "First", OrgType::Federation, None),
            unit(1, "Second", OrgType::Federation, None),
        ];
        let index = HierarchyIndex::build(&records).expect("build");
        assert_eq!(index.len(), 1);
        assert_eq!(index.unit(1).map(|u| u.name.as_str()), Some("First"));
    }

    #[test]
    fn tree_serializes_with_contract_field_names() {
        let index = HierarchyIndex::build(&sample_records()).expect("build");
        let tree = OrgForest::subtree(&index, 4).expect("subtree");
        let json = serde_json::to_value(&tree).expect("serialize");
        assert_eq!(json["orgType"], "localAssociation");
        assert_eq!(json["deletedFlag"], false);
        assert!(json["children"].as_array().is_some_and(Vec::is_empty));
    }
}
