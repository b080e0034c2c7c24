//! Known-topology and property tests for hierarchy construction.
//!
//! Scenario tests use hand-crafted record sets with analytically known
//! structure. Property tests generate acyclic-by-construction snapshots
//! (every parent id is smaller than its child's id) and check the path
//! contract on every node.

use proptest::prelude::*;

use verband_core::{Error, OrgId, OrgType, OrgUnit};
use verband_graph::hierarchy::{HierarchyIndex, OrgForest, resolve_path};
use verband_graph::stats::HierarchyStatistics;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

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

fn federation_snapshot() -> Vec<OrgUnit> {
    vec![
        unit(1, "Bundesverband", OrgType::Federation, None),
        unit(2, "Landesverband Nord", OrgType::RegionalBody, Some(1)),
        unit(3, "Landesverband Sued", OrgType::RegionalBody, Some(1)),
        unit(4, "Region Kueste", OrgType::Region, Some(2)),
        unit(5, "Verein Kiel", OrgType::LocalAssociation, Some(4)),
        unit(6, "Verein Luebeck", OrgType::LocalAssociation, Some(4)),
        unit(7, "Verein Muenchen", OrgType::LocalAssociation, Some(3)),
    ]
}

// ---------------------------------------------------------------------------
// Scenario tests
// ---------------------------------------------------------------------------

#[test]
fn full_federation_forest_shape() {
    let index = HierarchyIndex::build(&federation_snapshot()).expect("build");
    let forest = OrgForest::from_index(&index);

    assert_eq!(forest.roots.len(), 1);
    let root = &forest.roots[&1];
    assert_eq!(root.children.len(), 2);

    let nord = &root.children[0];
    assert_eq!(nord.id, 2);
    assert_eq!(nord.children[0].id, 4);
    let locals: Vec<OrgId> = nord.children[0].children.iter().map(|n| n.id).collect();
    assert_eq!(locals, vec![5, 6]);
}

#[test]
fn paths_through_four_levels() {
    let index = HierarchyIndex::build(&federation_snapshot()).expect("build");

    let path = resolve_path(&index, 6).expect("path");
    let ids: Vec<OrgId> = path.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 6]);

    let path = resolve_path(&index, 7).expect("path");
    let ids: Vec<OrgId> = path.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 3, 7]);
}

#[test]
fn cycle_anywhere_fails_the_whole_build() {
    let mut records = federation_snapshot();
    // Close a loop far from the root: 4 → 2 → 1 stays fine, but make
    // 2's parent the leaf 5, which sits under 4 under 2.
    records[1].parent = Some(5);

    let err = HierarchyIndex::build(&records).expect_err("must fail");
    assert!(matches!(err, Error::CycleDetected { .. }));
}

#[test]
fn statistics_agree_with_snapshot() {
    let mut records = federation_snapshot();
    records.push(unit(99, "Verwaist", OrgType::LocalAssociation, Some(1000)));
    records[6].deleted_flag = true;

    let index = HierarchyIndex::build(&records).expect("build");
    let stats = HierarchyStatistics::from_index(&index);

    assert_eq!(stats.node_count, 8);
    assert_eq!(stats.root_count, 1);
    assert_eq!(stats.orphan_count, 1);
    assert_eq!(stats.deleted_count, 1);
    assert_eq!(stats.by_org_type[&OrgType::LocalAssociation], 4);
    assert_eq!(stats.by_org_type[&OrgType::RegionalBody], 2);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

/// Generate an acyclic snapshot: node with id `i + 1` may only name a
/// strictly smaller id as parent.
fn arbitrary_snapshot() -> impl Strategy<Value = Vec<OrgUnit>> {
    proptest::collection::vec(proptest::option::of(0usize..64), 1..64).prop_map(|choices| {
        choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let id = OrgId::try_from(i + 1).expect("small index");
                let parent = if i == 0 {
                    None
                } else {
                    choice.map(|c| OrgId::try_from((c % i) + 1).expect("small index"))
                };
                unit(id, &format!("unit-{id}"), OrgType::Region, parent)
            })
            .collect()
    })
}

fn depth_of(records: &[OrgUnit], id: OrgId) -> usize {
    let mut depth = 0;
    let mut current = id;
    loop {
        let record = records
            .iter()
            .find(|r| r.id == current)
            .expect("id exists in snapshot");
        match record.parent {
            Some(parent) => {
                depth += 1;
                current = parent;
            }
            None => return depth,
        }
    }
}

proptest! {
    #[test]
    fn path_starts_at_root_ends_at_target_with_depth_plus_one(records in arbitrary_snapshot()) {
        let index = HierarchyIndex::build(&records).expect("acyclic by construction");

        for record in &records {
            let path = resolve_path(&index, record.id).expect("indexed id resolves");
            prop_assert_eq!(path.len(), depth_of(&records, record.id) + 1);
            prop_assert_eq!(path.last().map(|n| n.id), Some(record.id));
            let head = index.unit(path[0].id).expect("head indexed");
            prop_assert!(head.parent.is_none(), "path must start at a root");
        }
    }

    #[test]
    fn build_is_order_independent(records in arbitrary_snapshot()) {
        let forward = OrgForest::from_index(
            &HierarchyIndex::build(&records).expect("acyclic by construction"),
        );
        let mut reversed = records;
        reversed.reverse();
        let backward = OrgForest::from_index(
            &HierarchyIndex::build(&reversed).expect("acyclic by construction"),
        );
        prop_assert_eq!(forward, backward);
    }
}
