#![allow(clippy::module_name_repetitions)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::MemberId;

/// One flat family-relationship row: `child` has `parent` as a parent.
///
/// Edges are directional child→parent. The relationship type and status are
/// opaque keytable ids; the engine aggregates by them but never interprets
/// them. A self-relationship (child == parent) is invalid data and is
/// rejected by [`FamilyEdge::new`] and again by the graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyEdge {
    pub child: MemberId,
    pub parent: MemberId,
    pub relationship_type: i64,
    pub status: i64,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    /// Explicit active flag. When absent, effectiveness falls back to the
    /// validity window.
    #[serde(default)]
    pub active: Option<bool>,
}

impl FamilyEdge {
    /// Construct a checked edge.
    ///
    /// # Errors
    ///
    /// - [`Error::SelfRelation`] if `child == parent`.
    /// - [`Error::InvalidValidityWindow`] if both window ends are set and
    ///   `valid_from > valid_until`. Open-ended windows are fine.
    pub fn new(
        child: MemberId,
        parent: MemberId,
        relationship_type: i64,
        status: i64,
        valid_from: Option<DateTime<Utc>>,
        valid_until: Option<DateTime<Utc>>,
        active: Option<bool>,
    ) -> Result<Self> {
        let edge = Self {
            child,
            parent,
            relationship_type,
            status,
            valid_from,
            valid_until,
            active,
        };
        edge.validate()?;
        Ok(edge)
    }

    /// Re-check the construction invariants on an edge deserialized from
    /// the store.
    ///
    /// # Errors
    ///
    /// Same as [`FamilyEdge::new`].
    pub fn validate(&self) -> Result<()> {
        if self.child == self.parent {
            return Err(Error::SelfRelation { member: self.child });
        }
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until) {
            if from > until {
                return Err(Error::InvalidValidityWindow {
                    child: self.child,
                    parent: self.parent,
                });
            }
        }
        Ok(())
    }

    /// Whether the relationship counts as current at `now`.
    ///
    /// An explicit `active` flag wins. Without one, the validity window must
    /// cover `now`; a missing end is open.
    #[must_use]
    pub fn is_effective(&self, now: DateTime<Utc>) -> bool {
        if let Some(active) = self.active {
            return active;
        }
        let starts_ok = self.valid_from.is_none_or(|from| from <= now);
        let ends_ok = self.valid_until.is_none_or(|until| now <= until);
        starts_ok && ends_ok
    }
}
