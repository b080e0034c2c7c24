#![forbid(unsafe_code)]
//! verband-access library.
//!
//! The tenant access guard: one pure, enumerable decision function invoked
//! at the request boundary before any domain operation runs. It consumes
//! the caller's [`verband_core::AccessClaims`] and the requested unit id
//! and produces an allow/deny value — it never errors, because a denial is
//! an expected outcome, not an exceptional one.
//!
//! # Conventions
//!
//! - **Logging**: `tracing` `debug!` on deny paths.

pub mod guard;

pub use guard::{Decision, DenyReason, decide, decide_from_claims};
