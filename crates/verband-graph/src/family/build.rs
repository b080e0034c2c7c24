//! Depth-bounded family graph construction for one member.
//!
//! # Overview
//!
//! [`FamilyGraphBuilder`] holds one validated snapshot of [`FamilyEdge`]
//! rows, indexed in both directions, and materializes a [`FamilyGraph`] per
//! queried member:
//!
//! - **Parents**: edges where the queried member is the child; each found
//!   parent is re-queried as a child, so deeper levels are grandparents and
//!   beyond, up to the depth bound.
//! - **Children**: symmetric, descending through child edges.
//! - **Siblings**: derived, never stored — members sharing at least one
//!   parent with the queried member, at depth 1 only, never the member
//!   itself.
//!
//! Each direction is traversed level by level: a whole level is claimed in
//! the visited set before the next level is expanded, so every relative
//! surfaces at its shallowest distance. A member who is both a direct
//! parent and a grandparent through another branch lands in the depth-1
//! group. The visited set stops re-entry loops (remarriage edges and the
//! like) and keeps `total_relatives` free of duplicates. The depth bound is
//! required: family edge data is not guaranteed acyclic, so an unbounded
//! traversal is never permitted.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use verband_core::{Error, FamilyEdge, MemberId, Result};

// ---------------------------------------------------------------------------
// FamilyGraphBuilder
// ---------------------------------------------------------------------------

/// Builder over one snapshot of family edges.
///
/// Construction validates every edge; a self-relationship or inverted
/// validity window fails the whole snapshot, matching the contract that a
/// graph is never built from known-bad data.
#[derive(Debug)]
pub struct FamilyGraphBuilder {
    edges: Vec<FamilyEdge>,
    /// Edge indices by child id, sorted by (parent, relationship type).
    by_child: HashMap<MemberId, Vec<usize>>,
    /// Edge indices by parent id, sorted by (child, relationship type).
    by_parent: HashMap<MemberId, Vec<usize>>,
    max_depth: usize,
    include_inactive: bool,
    now: DateTime<Utc>,
}

impl FamilyGraphBuilder {
    /// Index a validated edge snapshot with a required traversal bound.
    ///
    /// # Errors
    ///
    /// - [`Error::DepthLimitZero`] if `max_depth` is 0.
    /// - [`Error::SelfRelation`] / [`Error::InvalidValidityWindow`] if any
    ///   edge fails [`FamilyEdge::validate`].
    #[instrument(skip(edges))]
    pub fn new(edges: Vec<FamilyEdge>, max_depth: usize) -> Result<Self> {
        if max_depth == 0 {
            return Err(Error::DepthLimitZero);
        }
        for edge in &edges {
            edge.validate()?;
        }

        let mut by_child: HashMap<MemberId, Vec<usize>> = HashMap::new();
        let mut by_parent: HashMap<MemberId, Vec<usize>> = HashMap::new();
        for (i, edge) in edges.iter().enumerate() {
            by_child.entry(edge.child).or_default().push(i);
            by_parent.entry(edge.parent).or_default().push(i);
        }
        for indices in by_child.values_mut() {
            indices.sort_unstable_by_key(|&i| (edges[i].parent, edges[i].relationship_type));
        }
        for indices in by_parent.values_mut() {
            indices.sort_unstable_by_key(|&i| (edges[i].child, edges[i].relationship_type));
        }

        Ok(Self {
            edges,
            by_child,
            by_parent,
            max_depth,
            include_inactive: false,
            now: Utc::now(),
        })
    }

    /// Also traverse relations that are not effective (historical or
    /// explicitly inactive). Off by default.
    #[must_use]
    pub const fn include_inactive(mut self, include: bool) -> Self {
        self.include_inactive = include;
        self
    }

    /// Evaluate validity windows against `now` instead of the wall clock.
    #[must_use]
    pub const fn effective_at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Materialize the family graph rooted at `member`.
    ///
    /// A member absent from the edge set yields a graph with empty groups;
    /// having no recorded relatives is a valid, common case, not a fault.
    #[must_use]
    #[instrument(skip(self))]
    pub fn build(&self, member: MemberId) -> FamilyGraph {
        let parents = self.relatives_of(member, Direction::Up);
        let children = self.relatives_of(member, Direction::Down);
        let siblings = self.siblings_of(member);

        let mut relatives: BTreeSet<MemberId> = BTreeSet::new();
        let mut max_depth_reached = 0;
        for group in [&parents, &children, &siblings] {
            collect_members(group, &mut relatives, &mut max_depth_reached);
        }

        FamilyGraph {
            member,
            parents,
            children,
            siblings,
            total_relatives: relatives.len(),
            max_depth_reached,
        }
    }

    /// Whether an edge participates in traversal under the current policy.
    fn traversable(&self, edge: &FamilyEdge) -> bool {
        self.include_inactive || edge.is_effective(self.now)
    }

    /// Edge indices leading away from `member` in the given direction.
    fn edge_indices(&self, member: MemberId, direction: Direction) -> &[usize] {
        let index = match direction {
            Direction::Up => &self.by_child,
            Direction::Down => &self.by_parent,
        };
        index.get(&member).map_or(&[], Vec::as_slice)
    }

    /// All relatives of `member` in one direction, level by level.
    ///
    /// Every level is claimed in the visited set before the next one is
    /// expanded, so each relative is placed at its shallowest distance from
    /// `member` — a direct parent is never demoted to a grandparent slot by
    /// an edge between two parents.
    fn relatives_of(&self, member: MemberId, direction: Direction) -> Vec<FamilyTreeNode> {
        let mut visited: HashSet<MemberId> = HashSet::from([member]);

        let claimed = self.claim_level(member, direction, &mut visited);
        let mut nodes: Vec<FamilyTreeNode> = claimed
            .into_iter()
            .map(|i| self.node_from(i, direction, 1))
            .collect();

        self.expand_level(nodes.iter_mut().collect(), 2, &mut visited, direction);
        nodes
    }

    /// Traversable edges out of `member` whose far end is not yet visited.
    /// Claims each far end so later levels cannot re-materialize it.
    fn claim_level(
        &self,
        member: MemberId,
        direction: Direction,
        visited: &mut HashSet<MemberId>,
    ) -> Vec<usize> {
        self.edge_indices(member, direction)
            .iter()
            .copied()
            .filter(|&i| {
                let edge = &self.edges[i];
                self.traversable(edge) && visited.insert(direction.far_end(edge))
            })
            .collect()
    }

    /// Attach the next level under every node of `frontier`, then recurse
    /// one level deeper. The whole frontier is claimed before any node's
    /// subtree is expanded.
    fn expand_level(
        &self,
        frontier: Vec<&mut FamilyTreeNode>,
        depth: usize,
        visited: &mut HashSet<MemberId>,
        direction: Direction,
    ) {
        if depth > self.max_depth || frontier.is_empty() {
            return;
        }

        let claimed: Vec<Vec<usize>> = frontier
            .iter()
            .map(|node| self.claim_level(node.member, direction, visited))
            .collect();

        let mut next: Vec<&mut FamilyTreeNode> = Vec::new();
        for (node, indices) in frontier.into_iter().zip(claimed) {
            node.children = indices
                .into_iter()
                .map(|i| self.node_from(i, direction, depth))
                .collect();
            next.extend(node.children.iter_mut());
        }

        self.expand_level(next, depth + 1, visited, direction);
    }

    fn node_from(&self, edge_index: usize, direction: Direction, depth: usize) -> FamilyTreeNode {
        let edge = &self.edges[edge_index];
        FamilyTreeNode::from_edge(
            direction.far_end(edge),
            direction.relation(),
            edge,
            self.now,
            depth,
            Vec::new(),
        )
    }

    /// Members sharing at least one parent with `member`, depth 1 only.
    fn siblings_of(&self, member: MemberId) -> Vec<FamilyTreeNode> {
        let mut found: BTreeSet<MemberId> = BTreeSet::new();

        if let Some(parent_edges) = self.by_child.get(&member) {
            for &i in parent_edges {
                let parent_edge = &self.edges[i];
                if !self.traversable(parent_edge) {
                    continue;
                }
                if let Some(child_edges) = self.by_parent.get(&parent_edge.parent) {
                    for &j in child_edges {
                        let sibling_edge = &self.edges[j];
                        if sibling_edge.child != member && self.traversable(sibling_edge) {
                            found.insert(sibling_edge.child);
                        }
                    }
                }
            }
        }

        found
            .into_iter()
            .map(|id| FamilyTreeNode {
                member: id,
                relation: Relation::Sibling,
                relationship_type_id: None,
                valid_from: None,
                valid_until: None,
                is_active: true,
                depth: 1,
                children: Vec::new(),
            })
            .collect()
    }
}

/// Traversal direction through the edge set.
#[derive(Debug, Clone, Copy)]
enum Direction {
    /// Toward parents: the current member is the child end of each edge.
    Up,
    /// Toward children: the current member is the parent end.
    Down,
}

impl Direction {
    const fn relation(self) -> Relation {
        match self {
            Self::Up => Relation::Parent,
            Self::Down => Relation::Child,
        }
    }

    const fn far_end(self, edge: &FamilyEdge) -> MemberId {
        match self {
            Self::Up => edge.parent,
            Self::Down => edge.child,
        }
    }
}

fn collect_members(
    nodes: &[FamilyTreeNode],
    relatives: &mut BTreeSet<MemberId>,
    max_depth: &mut usize,
) {
    for node in nodes {
        relatives.insert(node.member);
        *max_depth = (*max_depth).max(node.depth);
        collect_members(&node.children, relatives, max_depth);
    }
}

// ---------------------------------------------------------------------------
// FamilyGraph
// ---------------------------------------------------------------------------

/// Relation of a node to the queried member's branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Parent,
    Child,
    Sibling,
}

/// One materialized relative, owned by the graph value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTreeNode {
    pub member: MemberId,
    #[serde(rename = "relationshipType")]
    pub relation: Relation,
    /// Keytable id of the underlying edge. Derived siblings have none.
    pub relationship_type_id: Option<i64>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Distance from the queried member; direct relations are depth 1.
    pub depth: usize,
    /// Next traversal level in the same direction. Always present, even
    /// when empty.
    pub children: Vec<FamilyTreeNode>,
}

impl FamilyTreeNode {
    fn from_edge(
        member: MemberId,
        relation: Relation,
        edge: &FamilyEdge,
        now: DateTime<Utc>,
        depth: usize,
        children: Vec<FamilyTreeNode>,
    ) -> Self {
        Self {
            member,
            relation,
            relationship_type_id: Some(edge.relationship_type),
            valid_from: edge.valid_from,
            valid_until: edge.valid_until,
            is_active: edge.is_effective(now),
            depth,
            children,
        }
    }
}

/// The family graph for one member: three top-level groups plus counters.
///
/// Parents, children, and siblings are semantically distinct projections,
/// not a uniform descent, so the root exposes them separately instead of a
/// single child list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGraph {
    pub member: MemberId,
    pub parents: Vec<FamilyTreeNode>,
    pub children: Vec<FamilyTreeNode>,
    pub siblings: Vec<FamilyTreeNode>,
    /// Distinct relatives materialized across all groups.
    pub total_relatives: usize,
    /// Deepest level actually materialized; 0 when there are no relatives.
    pub max_depth_reached: usize,
}

impl FamilyGraph {
    /// Flattened, sorted, duplicate-free list of every relative in the
    /// graph.
    #[must_use]
    pub fn all_relatives(&self) -> Vec<MemberId> {
        let mut relatives = BTreeSet::new();
        let mut depth = 0;
        for group in [&self.parents, &self.children, &self.siblings] {
            collect_members(group, &mut relatives, &mut depth);
        }
        relatives.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
