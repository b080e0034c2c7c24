//! Flat record types read from the injected record store.
//!
//! These are the rows the engine consumes: [`org::OrgUnit`] parent-pointer
//! records for the organizational hierarchy and [`family::FamilyEdge`]
//! adjacency records for member family graphs. The engine never writes them.

pub mod family;
pub mod org;

pub use family::FamilyEdge;
pub use org::{FederationCode, OrgType, OrgUnit, UnknownVariant};
