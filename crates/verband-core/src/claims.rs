#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::org::UnknownVariant;
use crate::OrgId;

/// Caller role carried on the authenticated request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Full administrative access across all units.
    Admin,
    /// Access scoped to one organizational unit (the bound tenant).
    TenantUser,
    /// A member; unit-level cross-tenant checks do not apply.
    MemberUser,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::TenantUser => "tenantUser",
            Self::MemberUser => "memberUser",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    /// Case-insensitive parse accepting both the engine names and the
    /// legacy claim values ("admin", "dernek", "mitglied").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "tenantuser" | "dernek" => Ok(Self::TenantUser),
            "memberuser" | "mitglied" => Ok(Self::MemberUser),
            _ => Err(UnknownVariant {
                field: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Identity claims for one authenticated request.
///
/// Immutable for the request's duration. An unauthenticated caller has no
/// claims at all — the access guard takes `Option<&AccessClaims>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub role: Role,
    /// The organizational unit this caller is scoped to, if any.
    #[serde(default)]
    pub tenant: Option<OrgId>,
}

impl AccessClaims {
    /// Claims for a caller with no tenant binding.
    #[must_use]
    pub const fn unbound(role: Role) -> Self {
        Self { role, tenant: None }
    }

    /// Claims bound to one tenant unit.
    #[must_use]
    pub const fn bound(role: Role, tenant: OrgId) -> Self {
        Self {
            role,
            tenant: Some(tenant),
        }
    }
}
