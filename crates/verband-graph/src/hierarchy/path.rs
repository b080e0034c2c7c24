//! Root→target path resolution over a built [`HierarchyIndex`].
//!
//! Walks parent pointers upward from the target and reverses, so cost is
//! proportional to the target's depth, never to the snapshot size. The index
//! is cycle-checked on construction; the visited guard here is a second
//! fence so a future index variant can never send this walk into a loop.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use verband_core::{Error, OrgId, OrgType, Result};

use crate::hierarchy::build::HierarchyIndex;

/// One step of a root→target path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
    pub id: OrgId,
    pub name: String,
    pub org_type: OrgType,
}

/// Resolve the ordered path from the absolute root down to `target`,
/// inclusive.
///
/// A dangling parent pointer terminates the path at the last resolvable
/// unit, matching the orphans-as-roots contract of the builder.
///
/// # Errors
///
/// - [`Error::NotFound`] when `target` is not in the index.
/// - [`Error::CycleDetected`] if a parent chain revisits an id. Unreachable
///   through [`HierarchyIndex::build`], which rejects cyclic snapshots.
#[instrument(skip(index))]
pub fn resolve_path(index: &HierarchyIndex, target: OrgId) -> Result<Vec<PathNode>> {
    let mut current = index.unit(target).ok_or(Error::NotFound { id: target })?;

    let mut path: Vec<PathNode> = Vec::new();
    let mut visited: HashSet<OrgId> = HashSet::new();

    loop {
        if !visited.insert(current.id) {
            return Err(Error::CycleDetected { id: current.id });
        }
        path.push(PathNode {
            id: current.id,
            name: current.name.clone(),
            org_type: current.org_type,
        });

        let Some(parent_id) = current.parent else { break };
        let Some(parent) = index.unit(parent_id) else { break };
        current = parent;
    }

    path.reverse();
    Ok(path)
}
