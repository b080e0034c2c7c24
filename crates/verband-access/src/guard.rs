//! The tenant access decision function.
//!
//! # Decision rules (first match wins)
//!
//! 1. No claims (unauthenticated) → deny, [`DenyReason::Unauthenticated`].
//! 2. Admin → allow, unconditionally, for any unit.
//! 3. Tenant user: no bound tenant → deny; a requested unit differing from
//!    the bound tenant → deny; otherwise allow.
//! 4. Member user → allow. Finer-grained ownership checks belong to the
//!    domain-operation layer; this gate only excludes cross-tenant
//!    administrative leakage.
//!
//! Tenant matching is an opaque id equality check, never a subtree lookup
//! in the organizational hierarchy. A regional-body-scoped caller is
//! therefore not validated against child local-association ids; that
//! flat-tenancy model is inherited from the source system and recorded as
//! an open question in DESIGN.md.

use serde::Serialize;
use tracing::debug;

use verband_core::{AccessClaims, OrgId, Role};

/// Why a request was denied. Distinct kinds so the transport layer can map
/// [`DenyReason::Unauthenticated`] to 401 and [`DenyReason::Forbidden`] to
/// 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

/// Outcome of the access gate. Always a value, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "decision", content = "reason")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    /// Whether the domain operation may proceed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The deny reason, if any.
    #[must_use]
    pub const fn deny_reason(self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }
}

/// Decide whether the caller may act on `requested`.
///
/// `claims` is `None` for an unauthenticated caller. `requested` is the
/// unit id taken from the route or query, `None` when the request names no
/// specific unit.
#[must_use]
pub fn decide(claims: Option<&AccessClaims>, requested: Option<OrgId>) -> Decision {
    let Some(claims) = claims else {
        debug!("access denied: no claims on request");
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    match claims.role {
        Role::Admin => Decision::Allow,
        Role::TenantUser => {
            let Some(tenant) = claims.tenant else {
                debug!("access denied: tenant user without bound tenant");
                return Decision::Deny(DenyReason::Forbidden);
            };
            match requested {
                Some(unit) if unit != tenant => {
                    debug!(tenant, unit, "access denied: cross-tenant request");
                    Decision::Deny(DenyReason::Forbidden)
                }
                _ => Decision::Allow,
            }
        }
        Role::MemberUser => Decision::Allow,
    }
}

/// Decide from the raw claim strings carried on the request context.
///
/// The role claim and ids are opaque strings at the transport boundary:
/// an unparseable role is treated as unauthenticated; for tenant users an
/// unparseable tenant or requested id can never match and is denied.
#[must_use]
pub fn decide_from_claims(
    role_claim: &str,
    tenant_claim: Option<&str>,
    requested: Option<&str>,
) -> Decision {
    let Ok(role) = role_claim.parse::<Role>() else {
        debug!(role_claim, "access denied: unknown role claim");
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    let tenant = tenant_claim.and_then(|s| s.trim().parse::<OrgId>().ok());
    if matches!(role, Role::TenantUser) && tenant_claim.is_some() && tenant.is_none() {
        debug!("access denied: unparseable tenant claim");
        return Decision::Deny(DenyReason::Forbidden);
    }

    let requested_id = match requested {
        None => None,
        Some(raw) => match raw.trim().parse::<OrgId>() {
            Ok(id) => Some(id),
            Err(_) => {
                if matches!(role, Role::TenantUser) {
                    debug!(raw, "access denied: unparseable requested unit id");
                    return Decision::Deny(DenyReason::Forbidden);
                }
                None
            }
        },
    };

    let claims = AccessClaims { role, tenant };
    decide(Some(&claims), requested_id)
}
