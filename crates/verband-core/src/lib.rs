#![forbid(unsafe_code)]
//! verband-core library.
//!
//! Flat record types, caller claims, and the error taxonomy shared by the
//! verband engine crates. Everything here is a plain value: records arrive
//! from an injected store, engines build trees from them, and nothing in
//! this crate holds state beyond one request.
//!
//! # Conventions
//!
//! - **Errors**: typed [`Error`] with stable machine codes ([`ErrorCode`]).
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod claims;
pub mod error;
pub mod model;

pub use claims::{AccessClaims, Role};
pub use error::{Error, ErrorCode, Result};
pub use model::family::FamilyEdge;
pub use model::org::{FederationCode, OrgType, OrgUnit};

/// Identifier of an organizational unit.
pub type OrgId = i64;

/// Identifier of a member.
pub type MemberId = i64;
